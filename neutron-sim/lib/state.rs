//! The neutron spin ket and the measurement probabilities derived from it.
//!
//! A ket ψ = (a, b) is stored as the four reals `[Re a, Im a, Re b, Im b]`,
//! with `a` the amplitude of spin up along the static field (z) axis.

use num_complex::Complex64 as C64;
use crate::{
    error::{ Error, Result },
    vector::Vector,
};

/// Number of real components in a ket.
pub const NUM_EQ: usize = 4;

/// Real-valued representation of a spin-1/2 ket.
pub type Ket = Vector<NUM_EQ, f64>;

impl Ket {
    /// Spin up along z.
    pub const UP: Self = Vector([1.0, 0.0, 0.0, 0.0]);

    /// Spin down along z.
    pub const DOWN: Self = Vector([0.0, 0.0, 1.0, 0.0]);

    /// Build from the two complex amplitudes.
    pub fn from_amps(a: C64, b: C64) -> Self { Vector([a.re, a.im, b.re, b.im]) }

    /// Return the two complex amplitudes `(a, b)`.
    pub fn amps(&self) -> (C64, C64) {
        (C64::new(self.0[0], self.0[1]), C64::new(self.0[2], self.0[3]))
    }
}

/// Probability of measuring spin up along x, `(1 + ⟨σx⟩) / 2`.
pub fn x_prob(u: &[f64; NUM_EQ]) -> f64 {
    0.5 + u[0] * u[2] + u[1] * u[3]
}

/// Probability of measuring spin up along y, `(1 + ⟨σy⟩) / 2`.
pub fn y_prob(u: &[f64; NUM_EQ]) -> f64 {
    0.5 + u[0] * u[3] - u[1] * u[2]
}

/// Probability of measuring spin up along z, `|a|²`.
pub fn z_prob(u: &[f64; NUM_EQ]) -> f64 {
    u[0] * u[0] + u[1] * u[1]
}

/// The neutron spin state.
///
/// This is the only mutable entity in the engine: pulses and precession
/// periods are applied to it in place, in whatever order the caller chooses.
/// Normalization is never enforced; see [`Self::norm_sqr`] to monitor drift.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StateVector {
    pub(crate) u: Ket,
}

impl Default for StateVector {
    fn default() -> Self { Self { u: Ket::UP } }
}

impl From<Ket> for StateVector {
    fn from(u: Ket) -> Self { Self { u } }
}

impl StateVector {
    /// Create a new state from an explicit 4-component ket
    /// `[Re a, Im a, Re b, Im b]`.
    ///
    /// Fails if `ket` does not have exactly four components.
    pub fn new(ket: &[f64]) -> Result<Self> {
        let mut state = Self::default();
        state.set_state(ket)?;
        Ok(state)
    }

    /// Replace the current ket.
    ///
    /// Fails if `ket` does not have exactly four components; the state is left
    /// untouched in that case.
    pub fn set_state(&mut self, ket: &[f64]) -> Result<()> {
        self.u = Ket::try_from(ket)
            .map_err(|_| Error::InvalidState { len: ket.len() })?;
        Ok(())
    }

    /// Return a copy of the current ket.
    pub fn get_state(&self) -> [f64; NUM_EQ] { self.u.0 }

    /// Return the current ket as a [`Ket`].
    pub fn ket(&self) -> Ket { self.u }

    /// Probability of measuring spin up along x.
    pub fn x_prob(&self) -> f64 { x_prob(&self.u.0) }

    /// Probability of measuring spin up along y.
    pub fn y_prob(&self) -> f64 { y_prob(&self.u.0) }

    /// Probability of measuring spin up along z.
    pub fn z_prob(&self) -> f64 { z_prob(&self.u.0) }

    /// `|a|² + |b|²`, equal to 1 for exact unitary evolution of a normalized
    /// initial state.
    pub fn norm_sqr(&self) -> f64 { self.u.norm_sqr() }

    /// Bloch vector `(⟨σx⟩, ⟨σy⟩, ⟨σz⟩)`.
    pub fn bloch_vector(&self) -> [f64; 3] {
        let (a, b) = self.u.amps();
        let ab = a.conj() * b;
        [2.0 * ab.re, 2.0 * ab.im, a.norm_sqr() - b.norm_sqr()]
    }
}

/// Spin-up probabilities along each axis, recorded after every step of a
/// sampled integration.
///
/// Columns are append-only; successive integrations into the same trajectory
/// continue to extend it, each with its own time origin.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    pub time: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl Trajectory {
    /// Create a new, empty trajectory.
    pub fn new() -> Self { Self::default() }

    /// Create a new, empty trajectory with room for `n` samples.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            time: Vec::with_capacity(n),
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            z: Vec::with_capacity(n),
        }
    }

    /// Number of recorded samples.
    pub fn len(&self) -> usize { self.time.len() }

    pub fn is_empty(&self) -> bool { self.time.is_empty() }

    /// Append a sample of `state` at time `t`.
    pub fn record(&mut self, t: f64, state: &StateVector) {
        self.time.push(t);
        self.x.push(state.x_prob());
        self.y.push(state.y_prob());
        self.z.push(state.z_prob());
    }
}

#[cfg(test)]
mod test {
    use std::f64::consts::FRAC_1_SQRT_2 as OVER_RT2;
    use approx::assert_abs_diff_eq;
    use super::*;

    #[test]
    fn default_is_spin_up() {
        let state = StateVector::default();
        assert_eq!(state.get_state(), [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(state.z_prob(), 1.0);
        assert_eq!(state.x_prob(), 0.5);
        assert_eq!(state.y_prob(), 0.5);
    }

    #[test]
    fn wrong_arity_is_rejected() {
        assert_eq!(
            StateVector::new(&[1.0, 0.0, 0.0]),
            Err(Error::InvalidState { len: 3 }),
        );
        let mut state = StateVector::default();
        let err = state.set_state(&[0.0; 5]).unwrap_err();
        assert_eq!(err, Error::InvalidState { len: 5 });
        assert_eq!(state.get_state(), [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn readback_is_exact_and_idempotent() {
        let ket = [0.6, 0.0, 0.1, 0.7937253933193772];
        let state = StateVector::new(&ket).unwrap();
        assert_eq!(state.get_state(), ket);
        assert_eq!(state.get_state(), state.get_state());
    }

    #[test]
    fn normalization_is_not_enforced() {
        let state = StateVector::new(&[2.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(state.norm_sqr(), 4.0);
    }

    #[test]
    fn axis_eigenstates() {
        // +x = (|↑⟩ + |↓⟩)/√2
        let px = [OVER_RT2, 0.0, OVER_RT2, 0.0];
        assert_abs_diff_eq!(x_prob(&px), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(y_prob(&px), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(z_prob(&px), 0.5, epsilon = 1e-15);

        // -x
        let mx = [OVER_RT2, 0.0, -OVER_RT2, 0.0];
        assert_abs_diff_eq!(x_prob(&mx), 0.0, epsilon = 1e-15);

        // +y = (|↑⟩ + i|↓⟩)/√2
        let py = [OVER_RT2, 0.0, 0.0, OVER_RT2];
        assert_abs_diff_eq!(y_prob(&py), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(x_prob(&py), 0.5, epsilon = 1e-15);

        // -y
        let my = [OVER_RT2, 0.0, 0.0, -OVER_RT2];
        assert_abs_diff_eq!(y_prob(&my), 0.0, epsilon = 1e-15);

        let down = Ket::DOWN.0;
        assert_eq!(z_prob(&down), 0.0);
        assert_eq!(x_prob(&down), 0.5);
    }

    #[test]
    fn probabilities_match_bloch_vector() {
        let a = C64::new(0.3, -0.4);
        let b = C64::from_polar((1.0 - a.norm_sqr()).sqrt(), 2.1);
        let state = StateVector::from(Ket::from_amps(a, b));
        let [sx, sy, sz] = state.bloch_vector();
        assert_abs_diff_eq!(state.x_prob(), (1.0 + sx) / 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(state.y_prob(), (1.0 + sy) / 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(state.z_prob(), (1.0 + sz) / 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(
            sx * sx + sy * sy + sz * sz, 1.0, epsilon = 1e-14);
    }

    #[test]
    fn trajectory_records_columns() {
        let mut traj = Trajectory::with_capacity(2);
        assert!(traj.is_empty());
        traj.record(0.5, &StateVector::default());
        traj.record(1.0, &StateVector::from(Ket::DOWN));
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.time, vec![0.5, 1.0]);
        assert_eq!(traj.z, vec![1.0, 0.0]);
        assert_eq!(traj.x, vec![0.5, 0.5]);
    }
}
