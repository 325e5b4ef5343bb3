//! Closed-form results for a circularly polarized drive, used to check the
//! numerical integrator.
//!
//! In the frame rotating with a circular drive the Hamiltonian is
//! time-independent, so a spin starting up along z undergoes ordinary Rabi
//! flopping at the generalized Rabi frequency `sqrt(Δ² + ω_RF²)`.

/// Generalized Rabi frequency `sqrt((ω - ω₀)² + ω_RF²)` of a circular drive.
pub fn rabi_frequency(w: f64, w0: f64, w_rf: f64) -> f64 {
    let det = w - w0;
    (det * det + w_rf * w_rf).sqrt()
}

/// Probability of spin up along z after a circular pulse of width `t`, for a
/// spin initially up:
/// ```text
/// P(t) = 1 - ω_RF² / (Δ² + ω_RF²) sin²(Ω t),   Ω = sqrt(Δ² + ω_RF²) / 2
/// ```
///
/// *Not defined* (returns NaN) if both the detuning and `w_rf` are zero.
pub fn circular_rabi_z_prob(w: f64, w0: f64, w_rf: f64, t: f64) -> f64 {
    let det = w - w0;
    let omega = rabi_frequency(w, w0, w_rf) / 2.0;
    let s = (omega * t).sin();
    1.0 - w_rf * w_rf / (det * det + w_rf * w_rf) * s * s
}

#[cfg(test)]
mod test {
    use std::f64::consts::PI;
    use approx::assert_abs_diff_eq;
    use super::*;

    #[test]
    fn resonant_pi_pulse_flips() {
        assert_abs_diff_eq!(
            circular_rabi_z_prob(20.0, 20.0, PI / 2.0, 2.0), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(
            circular_rabi_z_prob(20.0, 20.0, PI / 2.0, 4.0), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn detuning_limits_contrast() {
        // with Δ = ω_RF, the spin never gets below half
        let p = circular_rabi_z_prob(21.0, 20.0, 1.0, PI / 2.0_f64.sqrt());
        assert_abs_diff_eq!(p, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_input_is_nan() {
        assert!(circular_rabi_z_prob(20.0, 20.0, 0.0, 1.0).is_nan());
        assert_eq!(rabi_frequency(20.0, 20.0, 0.0), 0.0);
    }
}
