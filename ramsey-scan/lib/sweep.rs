//! Scan variables and the grids they are swept over.

use std::fmt;
use serde::{ Deserialize, Serialize };
use crate::error::{ Error, Result };

/// A parameter that can be scanned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepVar {
    /// Drive frequency ω (rad/s).
    Frequency,
    /// Initial drive phase φ (rad).
    Phase,
    /// Width of each RF pulse (s).
    PulseWidth,
}

impl SweepVar {
    /// Column name used in output tables.
    pub fn column(self) -> &'static str {
        match self {
            Self::Frequency => "w",
            Self::Phase => "phi",
            Self::PulseWidth => "pulseWidth",
        }
    }
}

impl fmt::Display for SweepVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frequency => f.write_str("frequency"),
            Self::Phase => f.write_str("phase"),
            Self::PulseWidth => f.write_str("pulse width"),
        }
    }
}

/// Largest number of points a range or window may expand to.
pub const MAX_POINTS: usize = 100_000_000;

/// Evenly spaced values from `start` to `stop` (inclusive, up to rounding).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl Range {
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    /// Number of points in the range.
    pub fn len(&self) -> Result<usize> {
        let finite
            = self.start.is_finite()
            && self.stop.is_finite()
            && self.step.is_finite();
        if !finite || self.step <= 0.0 {
            return Err(Error::scan(format!("bad range {:?}", self)));
        }
        if self.stop < self.start {
            return Err(Error::scan(
                format!("range stop {} before start {}", self.stop, self.start)));
        }
        let span = (self.stop - self.start) / self.step;
        let count = (span + 1e-9 * span.max(1.0)).floor();
        if !count.is_finite() || count >= MAX_POINTS as f64 {
            return Err(Error::scan(
                format!("range {:?} has more than {} points", self, MAX_POINTS)));
        }
        Ok(count as usize + 1)
    }

    /// Generate the values of the range.
    pub fn values(&self) -> Result<Vec<f64>> {
        let n = self.len()?;
        Ok((0..n).map(|k| self.start + k as f64 * self.step).collect())
    }
}

/// A variable together with the values it takes.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    pub var: SweepVar,
    #[serde(flatten)]
    pub range: Range,
}

impl Sweep {
    pub fn new(var: SweepVar, range: Range) -> Self { Self { var, range } }

    pub fn values(&self) -> Result<Vec<f64>> { self.range.values() }
}

/// A symmetric window of drive frequencies around a centre frequency, used to
/// resolve the bottom of a fringe.
///
/// Covers `centre - half_points * spacing` up to (but excluding)
/// `centre + half_points * spacing`, for `2 * half_points` points in total.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Window {
    pub half_points: usize,
    pub spacing: f64,
}

impl Window {
    pub fn new(half_points: usize, spacing: f64) -> Self {
        Self { half_points, spacing }
    }

    /// Offsets from the centre.
    pub fn offsets(&self) -> Result<Vec<f64>> {
        if self.half_points == 0 || !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(Error::scan(format!("bad frequency window {:?}", self)));
        }
        let points
            = self.half_points.checked_mul(2)
            .filter(|p| *p <= MAX_POINTS)
            .ok_or_else(|| Error::scan(
                format!("window {:?} has more than {} points", self, MAX_POINTS)))?;
        let n = self.half_points as f64;
        Ok(
            (0..points)
                .map(|i| -n * self.spacing + i as f64 * self.spacing)
                .collect()
        )
    }

    /// Absolute frequencies around `centre`.
    pub fn values(&self, centre: f64) -> Result<Vec<f64>> {
        Ok(self.offsets()?.into_iter().map(|dw| centre + dw).collect())
    }
}
