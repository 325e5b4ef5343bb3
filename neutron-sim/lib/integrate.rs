//! Evolution of a [`StateVector`] through RF pulses and free precession.
//!
//! Pulses are integrated with fixed-step fourth-order Runge-Kutta. Free
//! precession is applied as a closed-form rotation.
//!
//! The state is never renormalized; `|a|² + |b|²` drifts with the step size.

use num_complex::Complex64 as C64;
use tracing::trace;
use crate::{
    error::{ Error, Result },
    field::{ Dynamics, FieldParams },
    state::{ Ket, StateVector, Trajectory },
};

/// Relative tolerance on `duration / dt` being a whole number of steps.
pub const STEP_TOL: f64 = 1e-9;

/// Compute the number of steps of size `dt` that make up `duration`.
///
/// Fails unless `dt` is finite and positive, `duration` is finite and
/// non-negative, and `dt` evenly divides `duration` (to within [`STEP_TOL`]).
pub fn step_count(duration: f64, dt: f64) -> Result<usize> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(Error::param(
            format!("step size must be finite and positive, got {}", dt)));
    }
    if !duration.is_finite() || duration < 0.0 {
        return Err(Error::param(
            format!("duration must be finite and non-negative, got {}", duration)));
    }
    let n = duration / dt;
    let n_round = n.round();
    if !n.is_finite() || n_round >= usize::MAX as f64 {
        return Err(Error::param(
            format!("too many steps of size {} in duration {}", dt, duration)));
    }
    if (n - n_round).abs() > STEP_TOL * n_round.max(1.0) {
        return Err(Error::param(
            format!(
                "step size {} does not evenly divide duration {} ({} steps)",
                dt, duration, n,
            )
        ));
    }
    Ok(n_round as usize)
}

impl StateVector {
    /// Take a single RK4 step of size `dt` from time `t`.
    pub fn rk_step<D>(&mut self, t: f64, dt: f64, dynamics: &D)
    where D: Dynamics + ?Sized
    {
        let u = self.u;
        let k1 = dynamics.derivs(t, &u);
        let k2 = dynamics.derivs(t + dt / 2.0, &(u + k1 * (dt / 2.0)));
        let k3 = dynamics.derivs(t + dt / 2.0, &(u + k2 * (dt / 2.0)));
        let k4 = dynamics.derivs(t + dt, &(u + k3 * dt));
        self.u = u + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0);
    }

    /// Integrate over `duration` from t = 0 in steps of `dt`.
    ///
    /// `dt` must evenly divide `duration`; see [`step_count`]. A zero duration
    /// leaves the state unchanged.
    pub fn integrate<D>(&mut self, duration: f64, dt: f64, dynamics: &D)
        -> Result<()>
    where D: Dynamics + ?Sized
    {
        let n = step_count(duration, dt)?;
        trace!(duration, dt, steps = n, "integrate");
        (0..n).for_each(|k| { self.rk_step(k as f64 * dt, dt, dynamics); });
        Ok(())
    }

    /// Like [`Self::integrate`], but also append `(t, x, y, z)` spin-up
    /// probabilities to `traj` after every step.
    ///
    /// Exactly `duration / dt` samples are recorded; the initial state is not.
    pub fn integrate_sampled<D>(
        &mut self,
        duration: f64,
        dt: f64,
        dynamics: &D,
        traj: &mut Trajectory,
    ) -> Result<()>
    where D: Dynamics + ?Sized
    {
        let n = step_count(duration, dt)?;
        trace!(duration, dt, steps = n, "integrate_sampled");
        traj.time.reserve(n);
        traj.x.reserve(n);
        traj.y.reserve(n);
        traj.z.reserve(n);
        for k in 0..n {
            self.rk_step(k as f64 * dt, dt, dynamics);
            traj.record((k + 1) as f64 * dt, self);
        }
        Ok(())
    }

    /// Apply the exact propagator for free precession about z at angular
    /// frequency `w0` over `duration`.
    ///
    /// This is a rotation by `w0 * duration` about the static field axis, with
    /// the same sign convention as the static term of [`FieldParams`]:
    /// `a → a e^{-i w0 T / 2}`, `b → b e^{+i w0 T / 2}`.
    pub fn larmor_precess(&mut self, duration: f64, w0: f64) {
        let (a, b) = self.u.amps();
        let ph = C64::cis(-0.5 * w0 * duration);
        self.u = Ket::from_amps(a * ph, b * ph.conj());
    }

    /// Apply an evolution operation to the state.
    pub fn apply<E>(&mut self, op: &E) -> Result<()>
    where E: Evolution + ?Sized
    {
        op.evolve(self)
    }

    /// Apply a sequence of evolution operations in order, stopping at the
    /// first failure.
    pub fn apply_all<'a, I>(&mut self, ops: I) -> Result<()>
    where I: IntoIterator<Item = &'a Operation>
    {
        ops.into_iter().try_for_each(|op| self.apply(op))
    }
}

/// Something that can be applied to a [`StateVector`].
pub trait Evolution {
    fn evolve(&self, state: &mut StateVector) -> Result<()>;
}

/// An RF pulse of fixed width, integrated numerically.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pulse {
    pub params: FieldParams,
    /// Pulse width (s).
    pub duration: f64,
    /// Integration step (s); must evenly divide `duration`.
    pub step: f64,
}

impl Pulse {
    pub fn new(params: FieldParams, duration: f64, step: f64) -> Self {
        Self { params, duration, step }
    }

    /// Drive phase at the end of the pulse.
    pub fn end_phase(&self) -> f64 { self.params.drive_phase(self.duration) }
}

impl Evolution for Pulse {
    fn evolve(&self, state: &mut StateVector) -> Result<()> {
        state.integrate(self.duration, self.step, &self.params)
    }
}

/// A period of free precession in the static field, applied exactly.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FreePrecession {
    /// Length of the period (s).
    pub duration: f64,
    /// Larmor frequency ω₀ (rad/s).
    pub w0: f64,
}

impl FreePrecession {
    pub fn new(duration: f64, w0: f64) -> Self { Self { duration, w0 } }
}

impl Evolution for FreePrecession {
    fn evolve(&self, state: &mut StateVector) -> Result<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(Error::param(
                format!(
                    "precession time must be finite and non-negative, got {}",
                    self.duration,
                )
            ));
        }
        state.larmor_precess(self.duration, self.w0);
        Ok(())
    }
}

/// Either kind of evolution, for building pulse sequences as data.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Operation {
    Pulse(Pulse),
    Precess(FreePrecession),
}

impl From<Pulse> for Operation {
    fn from(pulse: Pulse) -> Self { Self::Pulse(pulse) }
}

impl From<FreePrecession> for Operation {
    fn from(prec: FreePrecession) -> Self { Self::Precess(prec) }
}

impl Evolution for Operation {
    fn evolve(&self, state: &mut StateVector) -> Result<()> {
        match self {
            Self::Pulse(pulse) => pulse.evolve(state),
            Self::Precess(prec) => prec.evolve(state),
        }
    }
}
