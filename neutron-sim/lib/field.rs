//! Hamiltonians for a neutron in a static field along z plus a transverse RF
//! field, either linearly or circularly polarized.
//!
//! With drive phase θ(t) = ω t + φ, the Hamiltonian (in units of angular
//! frequency) is
//! ```text
//! H_circ(t) = (ω₀/2) σz + (ω_RF/2) (cos θ σx + sin θ σy)
//! H_lin(t)  = (ω₀/2) σz + (ω_RF/2) cos θ σx
//! ```
//! A linear field of amplitude ω_RF decomposes into two counter-rotating
//! circular components of amplitude ω_RF/2; the one rotating against the spin
//! is what produces the Bloch–Siegert shift.

use std::{ fmt, str::FromStr };
use num_complex::Complex64 as C64;
use crate::{
    error::{ Error, Result },
    state::Ket,
};

/// Selects the polarization of the RF drive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum FieldType {
    /// Oscillating field along a fixed transverse axis.
    #[cfg_attr(feature = "serde", serde(alias = "lin"))]
    Linear,
    /// Field rotating in the transverse plane at the drive frequency.
    #[cfg_attr(feature = "serde", serde(alias = "circ"))]
    Circular,
}

impl FieldType {
    /// Numeric selector of a linear drive in legacy parameter lists.
    pub const LIN_ID: i64 = 0;

    /// Numeric selector of a circular drive in legacy parameter lists.
    pub const CIRC_ID: i64 = 1;

    /// Return the legacy numeric selector.
    pub fn id(self) -> i64 {
        match self {
            Self::Linear => Self::LIN_ID,
            Self::Circular => Self::CIRC_ID,
        }
    }

    /// Fraction of the RF amplitude that co-rotates with the spin.
    pub fn corotating_fraction(self) -> f64 {
        match self {
            Self::Linear => 0.5,
            Self::Circular => 1.0,
        }
    }

    /// RF amplitude ω_RF needed to rotate the spin by `area` radians on
    /// resonance over `duration`.
    ///
    /// E.g. `amplitude_for(PI, t)` gives a π pulse of width `t`.
    pub fn amplitude_for(self, area: f64, duration: f64) -> f64 {
        area / (self.corotating_fraction() * duration)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Circular => "circular",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "lin" => Ok(Self::Linear),
            "circular" | "circ" => Ok(Self::Circular),
            other => Err(Error::param(
                format!("unrecognized field type {:?}", other))),
        }
    }
}

impl TryFrom<i64> for FieldType {
    type Error = Error;

    fn try_from(id: i64) -> Result<Self> {
        match id {
            Self::LIN_ID => Ok(Self::Linear),
            Self::CIRC_ID => Ok(Self::Circular),
            other => Err(Error::param(
                format!("unrecognized field type selector {}", other))),
        }
    }
}

impl TryFrom<f64> for FieldType {
    type Error = Error;

    fn try_from(id: f64) -> Result<Self> {
        if id.fract() != 0.0 || !id.is_finite() {
            return Err(Error::param(
                format!("unrecognized field type selector {}", id)));
        }
        Self::try_from(id as i64)
    }
}

/// Computes the time derivative of a ket.
///
/// This is the seam between the physical model and the integrator: anything
/// that can produce `du/dt` from `(t, u)` can be pushed through
/// [`StateVector::rk_step`][crate::state::StateVector::rk_step].
pub trait Dynamics {
    /// Return `du/dt` at time `t`.
    fn derivs(&self, t: f64, u: &Ket) -> Ket;
}

/// Physical parameters of a single pulse.
///
/// All frequencies are angular (rad/s); `phase` is the drive phase at the
/// start of the pulse (t = 0 of the integration).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FieldParams {
    /// Drive frequency ω.
    pub frequency: f64,
    /// Static field strength ω₀, i.e. the Larmor frequency.
    pub w0: f64,
    /// RF field strength ω_RF.
    pub rf_amplitude: f64,
    /// Initial drive phase φ.
    pub phase: f64,
    /// Polarization of the drive.
    pub field: FieldType,
}

impl FieldParams {
    /// Create a new set of parameters.
    pub fn new(
        frequency: f64,
        w0: f64,
        rf_amplitude: f64,
        phase: f64,
        field: FieldType,
    ) -> Self
    {
        Self { frequency, w0, rf_amplitude, phase, field }
    }

    /// Parse the legacy ordered list `{ω, ω₀, ω_RF, φ, selector}`.
    pub fn from_slice(params: &[f64]) -> Result<Self> {
        match *params {
            [frequency, w0, rf_amplitude, phase, id] => {
                let field = FieldType::try_from(id)?;
                Ok(Self { frequency, w0, rf_amplitude, phase, field })
            },
            _ => Err(Error::param(
                format!("expected 5 field parameters, got {}", params.len()))),
        }
    }

    /// Same parameters with the drive switched off.
    pub fn free(w0: f64) -> Self {
        Self::new(0.0, w0, 0.0, 0.0, FieldType::Circular)
    }

    /// Return a copy with a different initial phase.
    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    /// Return a copy with a different drive frequency.
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    /// Return a copy with a different RF amplitude.
    pub fn with_rf_amplitude(mut self, rf_amplitude: f64) -> Self {
        self.rf_amplitude = rf_amplitude;
        self
    }

    /// Detuning ω − ω₀ of the drive from the Larmor frequency.
    pub fn detuning(&self) -> f64 { self.frequency - self.w0 }

    /// Drive phase θ(t) = ω t + φ.
    pub fn drive_phase(&self, t: f64) -> f64 {
        self.frequency * t + self.phase
    }

    /// Lower off-diagonal element `⟨↓|H|↑⟩` at time `t`; the upper one is its
    /// conjugate.
    pub fn coupling(&self, t: f64) -> C64 {
        let th = self.drive_phase(t);
        let half = 0.5 * self.rf_amplitude;
        match self.field {
            FieldType::Circular => half * C64::cis(th),
            FieldType::Linear => C64::from(half * th.cos()),
        }
    }

    /// Hamiltonian at time `t` as a row-major 2×2 matrix.
    pub fn hamiltonian(&self, t: f64) -> [[C64; 2]; 2] {
        let c = self.coupling(t);
        let e = C64::from(0.5 * self.w0);
        [[e, c.conj()], [c, -e]]
    }
}

impl Dynamics for FieldParams {
    fn derivs(&self, t: f64, u: &Ket) -> Ket {
        let (a, b) = u.amps();
        let [[h11, h12], [h21, h22]] = self.hamiltonian(t);
        let da = -C64::i() * (h11 * a + h12 * b);
        let db = -C64::i() * (h21 * a + h22 * b);
        Ket::from_amps(da, db)
    }
}

#[cfg(test)]
mod test {
    use std::f64::consts::PI;
    use approx::assert_abs_diff_eq;
    use super::*;

    fn params(field: FieldType) -> FieldParams {
        FieldParams::new(20.0, 20.0, PI / 2.0, 0.3, field)
    }

    #[test]
    fn selector_conversions() {
        assert_eq!(FieldType::try_from(0_i64), Ok(FieldType::Linear));
        assert_eq!(FieldType::try_from(1_i64), Ok(FieldType::Circular));
        assert_eq!(FieldType::try_from(1.0), Ok(FieldType::Circular));
        assert!(matches!(
            FieldType::try_from(2_i64),
            Err(Error::InvalidParameter(_)),
        ));
        assert!(FieldType::try_from(0.5).is_err());
        assert!(FieldType::try_from(f64::NAN).is_err());
        assert_eq!("Circular".parse::<FieldType>(), Ok(FieldType::Circular));
        assert_eq!(" lin ".parse::<FieldType>(), Ok(FieldType::Linear));
        assert!("elliptical".parse::<FieldType>().is_err());
        for field in [FieldType::Linear, FieldType::Circular] {
            assert_eq!(FieldType::try_from(field.id()), Ok(field));
            assert_eq!(field.to_string().parse::<FieldType>(), Ok(field));
        }
    }

    #[test]
    fn legacy_parameter_list() {
        let p = FieldParams::from_slice(&[20.0, 19.0, 1.5, 0.1, 0.0]).unwrap();
        assert_eq!(p, FieldParams::new(20.0, 19.0, 1.5, 0.1, FieldType::Linear));
        assert!(FieldParams::from_slice(&[20.0, 19.0, 1.5, 0.1]).is_err());
        assert!(FieldParams::from_slice(&[20.0, 19.0, 1.5, 0.1, 7.0]).is_err());
    }

    #[test]
    fn linear_pulse_needs_twice_the_amplitude() {
        let t = 4.286;
        let circ = FieldType::Circular.amplitude_for(PI / 2.0, t);
        let lin = FieldType::Linear.amplitude_for(PI / 2.0, t);
        assert_abs_diff_eq!(circ * t, PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(lin, 2.0 * circ, epsilon = 1e-12);
    }

    #[test]
    fn hamiltonian_is_hermitian() {
        for field in [FieldType::Linear, FieldType::Circular] {
            let p = params(field);
            for &t in [0.0, 0.013, 1.7].iter() {
                let h = p.hamiltonian(t);
                assert_eq!(h[0][1], h[1][0].conj());
                assert_eq!(h[0][0].im, 0.0);
                assert_eq!(h[1][1].im, 0.0);
            }
        }
    }

    #[test]
    fn linear_coupling_is_real_projection_of_circular() {
        let circ = params(FieldType::Circular);
        let lin = params(FieldType::Linear);
        for &t in [0.0, 0.25, 0.9].iter() {
            assert_abs_diff_eq!(
                lin.coupling(t).re, circ.coupling(t).re, epsilon = 1e-15);
            assert_eq!(lin.coupling(t).im, 0.0);
        }
    }

    #[test]
    fn derivative_preserves_norm() {
        // d/dt |u|² = 2 u · du/dt vanishes for Hermitian H
        let u = Ket::from_amps(C64::new(0.6, 0.1), C64::new(-0.2, 0.7681145747868608));
        for field in [FieldType::Linear, FieldType::Circular] {
            let du = params(field).derivs(0.4, &u);
            assert_abs_diff_eq!(u.dot(&du), 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn free_precession_derivative() {
        let p = FieldParams::free(20.0);
        let du = p.derivs(0.0, &Ket::UP);
        // da/dt = -i ω₀/2 a
        assert_eq!(du.0, [0.0, -10.0, 0.0, 0.0]);
    }
}
