//! Ramsey and Rabi resonance scans built on `neutron_sim`, for measuring the
//! Bloch–Siegert shift of a linearly polarized drive.
//!
//! A [`Scanner`] runs a [`Sequence`] at fixed [`config::Physics`] with one
//! variable swept, producing a [`Fringe`]; a shift scan repeats this over a
//! narrow frequency window for each value of an outer variable and locates
//! each fringe minimum with [`minimum::fringe_minimum`].

pub mod error;
pub mod sweep;
pub mod sequence;
pub mod config;
pub mod minimum;
pub mod scan;
pub mod sink;
pub mod cli;

pub use error::{ Error, Result };
pub use sweep::{ Range, Sweep, SweepVar, Window };
pub use sequence::Sequence;
pub use config::{ Config, ShiftScan };
pub use scan::{ Fringe, Scanner, ShiftSummary };
pub use sink::{ Header, NpzSink, Sink, TextSink };
