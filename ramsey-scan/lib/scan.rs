//! Fringes and Bloch–Siegert shift scans.

use std::sync::atomic::{ AtomicUsize, Ordering };
use rayon::iter::{ IntoParallelIterator, ParallelIterator };
use tracing::{ debug, info, info_span, warn };
use neutron_sim::FieldParams;
use crate::{
    config::{ Config, Physics, ShiftScan },
    error::{ Error, Result },
    minimum::{ fringe_minimum, grid_min },
    sequence::Sequence,
    sink::{ Header, Sink },
    sweep::{ Sweep, SweepVar },
};

/// Final Z probability as a function of one swept variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Fringe {
    pub var: SweepVar,
    pub x: Vec<f64>,
    pub z_prob: Vec<f64>,
}

impl Fringe {
    pub fn len(&self) -> usize { self.x.len() }

    pub fn is_empty(&self) -> bool { self.x.is_empty() }
}

/// Fringe minima for every value of the outer variable of a shift scan.
#[derive(Clone, Debug, PartialEq)]
pub struct ShiftSummary {
    /// Outer variable.
    pub var: SweepVar,
    /// Outer variable values.
    pub value: Vec<f64>,
    /// Sampled frequency with the smallest Z probability.
    pub grid_min: Vec<f64>,
    /// Vertex of the quadratic fit to each fringe.
    pub poly_min: Vec<f64>,
}

impl ShiftSummary {
    fn new(var: SweepVar, capacity: usize) -> Self {
        Self {
            var,
            value: Vec::with_capacity(capacity),
            grid_min: Vec::with_capacity(capacity),
            poly_min: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize { self.value.len() }

    pub fn is_empty(&self) -> bool { self.value.is_empty() }

    /// Append the minimum of `fringe`, taken at outer value `value`, and
    /// return its `(grid, fit)` estimates.
    ///
    /// A fringe whose quadratic fit fails is kept with a NaN fit minimum.
    pub fn record(&mut self, value: f64, fringe: &Fringe, w0: f64) -> (f64, f64) {
        let (grid, fit) = match fringe_minimum(&fringe.x, &fringe.z_prob, w0) {
            Ok(min) => (min.grid, min.fit),
            Err(err) => {
                warn!(value, %err, "no fitted minimum");
                let grid
                    = grid_min(&fringe.x, &fringe.z_prob)
                    .map_or(f64::NAN, |(x, _)| x);
                (grid, f64::NAN)
            },
        };
        self.value.push(value);
        self.grid_min.push(grid);
        self.poly_min.push(fit);
        (grid, fit)
    }

    /// Fitted minima relative to `w0`.
    pub fn shifts(&self, w0: f64) -> Vec<f64> {
        self.poly_min.iter().map(|w| w - w0).collect()
    }
}

/// Runs a sequence at fixed physical parameters, with one of them replaced
/// per scan point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Scanner {
    pub physics: Physics,
    pub sequence: Sequence,
    /// RK4 step.
    pub step: f64,
}

impl Scanner {
    pub fn new(physics: Physics, sequence: Sequence, step: f64) -> Self {
        Self { physics, sequence, step }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.physics, config.sequence, config.integration.step)
    }

    /// Return a copy with `var` set to `value`.
    ///
    /// Setting the pulse width also rescales the RF amplitude unless it is
    /// fixed, so that every pulse keeps its intended area.
    pub fn with_value(mut self, var: SweepVar, value: f64) -> Self {
        match var {
            SweepVar::Frequency => { self.physics.frequency = Some(value); },
            SweepVar::Phase => { self.physics.phase = value; },
            SweepVar::PulseWidth => {
                self.sequence = self.sequence.with_pulse_time(value);
            },
        }
        self
    }

    /// Drive parameters of the first pulse.
    pub fn params(&self) -> FieldParams {
        self.physics.field_params(
            self.sequence.pulse_area(), self.sequence.pulse_time())
    }

    /// Final Z probability of the sequence.
    pub fn point(&self) -> Result<f64> {
        Ok(self.sequence.run(self.params(), self.step)?.z_prob())
    }

    /// Parameters fixed for every point of a scan over `var`.
    pub fn header(&self, var: SweepVar) -> Header {
        let params = self.params();
        let mut header = Header::new();
        header.push("w0", params.w0);
        if var != SweepVar::Frequency {
            header.push("w", params.frequency);
        }
        if var != SweepVar::PulseWidth || self.physics.rf_amplitude.is_some() {
            header.push("wRF", params.rf_amplitude);
        }
        if var != SweepVar::Phase {
            header.push("phi", params.phase);
        }
        header.push("fieldType", params.field);
        if var != SweepVar::PulseWidth {
            header.push("pulseTime", self.sequence.pulse_time());
        }
        if let Sequence::Ramsey { precess_time, .. } = self.sequence {
            header.push("precessTime", precess_time);
        }
        header.push("dt", self.step);
        header
    }

    /// Evaluate the sequence at each of `xs` for `var`, in parallel.
    pub fn fringe_at(&self, var: SweepVar, xs: Vec<f64>) -> Result<Fringe> {
        let len = xs.len();
        let _span = info_span!("fringe", %var, points = len).entered();
        let stride = (len / 10).max(1);
        let progress = AtomicUsize::new(0);
        let z_prob: Vec<f64>
            = xs.clone().into_par_iter()
            .map(|x| {
                let z = self.with_value(var, x).point();
                let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
                if done % stride == 0 {
                    debug!(done, len, "fringe progress");
                }
                z
            })
            .collect::<Result<Vec<f64>>>()?;
        Ok(Fringe { var, x: xs, z_prob })
    }

    /// Evaluate the sequence over a sweep.
    pub fn fringe(&self, sweep: &Sweep) -> Result<Fringe> {
        self.fringe_at(sweep.var, sweep.values()?)
    }

    /// For every value of the outer variable, scan the drive frequency over
    /// the window around ω₀ and locate the fringe minimum.
    ///
    /// Each fringe is written to `sink` as `rf<k>`, `k` counting outer
    /// values from zero. A fringe whose fit fails is recorded with a NaN fit
    /// minimum and the scan continues.
    pub fn shift_scan(&self, scan: &ShiftScan, sink: &mut dyn Sink)
        -> Result<ShiftSummary>
    {
        if scan.outer.var == SweepVar::Frequency {
            return Err(Error::scan(
                "shift scan needs an outer variable other than frequency"));
        }
        let outer = scan.outer.values()?;
        let w0 = self.physics.w0;
        let _span = info_span!("shift_scan", var = %scan.outer.var, outer = outer.len())
            .entered();
        let mut summary = ShiftSummary::new(scan.outer.var, outer.len());
        for (k, &value) in outer.iter().enumerate() {
            let inner = self.with_value(scan.outer.var, value);
            let fringe = inner.fringe_at(SweepVar::Frequency, scan.window.values(w0)?)?;
            let header = inner.header(SweepVar::Frequency);
            sink.write_fringe(&format!("rf{}", k), &header, &fringe)?;
            let (grid, fit) = summary.record(value, &fringe, w0);
            info!(k, value, grid, fit, shift = fit - w0, "fringe minimum");
        }
        Ok(summary)
    }
}
