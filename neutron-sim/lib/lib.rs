//! Spin-1/2 evolution of a neutron in a static magnetic field plus a linearly
//! or circularly polarized RF field.
//!
//! The engine is a [`StateVector`] acted on by RF pulses (integrated with
//! fixed-step fourth-order Runge-Kutta under a [`FieldParams`] Hamiltonian)
//! and by exact free precession. Callers sequence the operations themselves:
//! ```
//! use neutron_sim::*;
//!
//! # fn main() -> Result<()> {
//! let w0 = 20.0;
//! let params = FieldParams::new(w0, w0, std::f64::consts::FRAC_PI_2, 0.0, FieldType::Circular);
//! let mut ucn = StateVector::default();
//! ucn.integrate(1.0, 0.001, &params)?;
//! ucn.larmor_precess(10.0, w0);
//! ucn.integrate(1.0, 0.001, &params.with_phase(w0 * 11.0))?;
//! assert!(ucn.z_prob() < 1e-6);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod vector;
pub mod state;
pub mod field;
pub mod integrate;
pub mod analytic;

pub use error::{ Error, Result };
pub use state::{ Ket, StateVector, Trajectory, NUM_EQ, x_prob, y_prob, z_prob };
pub use field::{ Dynamics, FieldParams, FieldType };
pub use integrate::{
    Evolution,
    FreePrecession,
    Operation,
    Pulse,
    step_count,
};
