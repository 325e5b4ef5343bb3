//! Run configuration, read from TOML.
//!
//! ```toml
//! threads = 0
//!
//! [physics]
//! w0 = 183.247172
//! field = "linear"
//! phase = 0.0
//!
//! [sequence]
//! kind = "ramsey"
//! pulse_time = 4.286
//! precess_time = 180.0
//!
//! [integration]
//! step = 0.001
//!
//! [shift]
//! outer = { var = "phase", start = 0.0, stop = 6.2, step = 0.1 }
//! window = { half_points = 100, spacing = 5e-7 }
//! ```
//!
//! The `[sweep]` table is read by single-fringe runs and `[shift]` by
//! Bloch–Siegert shift scans; each is optional so one file can serve either.

use std::{ f64::consts::TAU, fs, path::Path };
use serde::{ Deserialize, Serialize };
use neutron_sim::{ FieldParams, FieldType };
use crate::{
    error::{ Error, Result },
    sequence::Sequence,
    sweep::{ Range, Sweep, SweepVar, Window },
};

/// Larmor frequency of the reference experiment (rad/s).
pub const W0_REF: f64 = 183.247172;

/// π/2 pulse width of the reference Ramsey experiment (s).
pub const PULSE_TIME_REF: f64 = 4.286;

/// Free precession time of the reference Ramsey experiment (s).
pub const PRECESS_TIME_REF: f64 = 180.0;

/// RK4 step used by all reference runs (s).
pub const RK_STEP_REF: f64 = 0.001;

/// Fixed physical parameters of a run.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Physics {
    /// Static field strength ω₀ (rad/s).
    pub w0: f64,
    /// Drive frequency ω (rad/s); defaults to `w0`.
    #[serde(default)]
    pub frequency: Option<f64>,
    /// RF strength ω_RF (rad/s); if absent, chosen per point so that each
    /// pulse has the area called for by the sequence.
    #[serde(default)]
    pub rf_amplitude: Option<f64>,
    /// Initial drive phase φ (rad).
    #[serde(default)]
    pub phase: f64,
    pub field: FieldType,
}

impl Physics {
    /// Drive parameters for a sequence whose pulses have width `pulse_time`
    /// and on-resonance rotation angle `area`.
    pub fn field_params(&self, area: f64, pulse_time: f64) -> FieldParams {
        let rf_amplitude
            = self.rf_amplitude
            .unwrap_or_else(|| self.field.amplitude_for(area, pulse_time));
        FieldParams::new(
            self.frequency.unwrap_or(self.w0),
            self.w0,
            rf_amplitude,
            self.phase,
            self.field,
        )
    }
}

/// Numerical settings.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Integration {
    /// RK4 step (s); must evenly divide every pulse width.
    #[serde(default = "default_step")]
    pub step: f64,
}

fn default_step() -> f64 { RK_STEP_REF }

impl Default for Integration {
    fn default() -> Self { Self { step: default_step() } }
}

/// Bloch–Siegert shift scan: for every value of `outer`, a frequency fringe
/// over `window` around ω₀ whose minimum is located.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShiftScan {
    pub outer: Sweep,
    pub window: Window,
}

/// Everything needed to run a scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Worker threads for fringe points; 0 lets rayon decide.
    #[serde(default)]
    pub threads: usize,
    pub physics: Physics,
    pub sequence: Sequence,
    #[serde(default)]
    pub integration: Integration,
    #[serde(default)]
    pub sweep: Option<Sweep>,
    #[serde(default)]
    pub shift: Option<ShiftScan>,
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::scan(format!("cannot serialize config: {}", e)))
    }

    /// The `[sweep]` table, or an error naming what is missing.
    pub fn require_sweep(&self) -> Result<Sweep> {
        self.sweep.ok_or_else(|| Error::scan("config has no [sweep] table"))
    }

    /// The `[shift]` table, or an error naming what is missing.
    pub fn require_shift(&self) -> Result<ShiftScan> {
        self.shift.ok_or_else(|| Error::scan("config has no [shift] table"))
    }

    /// Output table name for a single fringe over `var`, e.g. `linRamsey`
    /// for a frequency fringe or `circRabiPulseWidth`.
    pub fn fringe_name(&self, var: SweepVar) -> String {
        let field = match self.physics.field {
            FieldType::Linear => "lin",
            FieldType::Circular => "circ",
        };
        let seq = match self.sequence {
            Sequence::Rabi { .. } => "Rabi",
            Sequence::Ramsey { .. } => "Ramsey",
        };
        let suffix = match var {
            SweepVar::Frequency => "",
            SweepVar::Phase => "Phase",
            SweepVar::PulseWidth => "PulseWidth",
        };
        format!("{}{}{}", field, seq, suffix)
    }

    /// Single circular π pulse on resonance at ω₀ = 20 rad/s, traced over
    /// 2 s.
    pub fn rabi_default() -> Self {
        Self {
            physics: Physics {
                w0: 20.0,
                frequency: None,
                rf_amplitude: None,
                phase: 0.0,
                field: FieldType::Circular,
            },
            sequence: Sequence::Rabi { pulse_time: 2.0 },
            integration: Integration::default(),
            threads: 0,
            sweep: None,
            shift: None,
        }
    }

    /// Circular Ramsey fringe from 180 to 186 rad/s.
    pub fn ramsey_default() -> Self {
        Self {
            physics: Physics {
                w0: W0_REF,
                frequency: None,
                rf_amplitude: None,
                phase: 0.0,
                field: FieldType::Circular,
            },
            sequence: Sequence::Ramsey {
                pulse_time: PULSE_TIME_REF,
                precess_time: PRECESS_TIME_REF,
            },
            integration: Integration::default(),
            threads: 0,
            sweep: Some(Sweep::new(
                SweepVar::Frequency,
                Range::new(180.0, 186.0, 0.001),
            )),
            shift: None,
        }
    }

    /// Bloch–Siegert shift of a linear Ramsey fringe as a function of the
    /// initial RF phase.
    pub fn shift_phase_default() -> Self {
        Self {
            physics: Physics {
                w0: W0_REF,
                frequency: None,
                rf_amplitude: None,
                phase: 0.0,
                field: FieldType::Linear,
            },
            sequence: Sequence::Ramsey {
                pulse_time: PULSE_TIME_REF,
                precess_time: PRECESS_TIME_REF,
            },
            integration: Integration::default(),
            threads: 0,
            sweep: None,
            shift: Some(ShiftScan {
                outer: Sweep::new(SweepVar::Phase, Range::new(0.0, TAU, 0.1)),
                window: Window::new(100, 5e-7),
            }),
        }
    }

    /// Bloch–Siegert shift of a linear Rabi fringe as a function of the π
    /// pulse width.
    pub fn shift_width_default() -> Self {
        Self {
            physics: Physics {
                w0: W0_REF,
                frequency: None,
                rf_amplitude: None,
                phase: 0.0,
                field: FieldType::Linear,
            },
            sequence: Sequence::Rabi { pulse_time: 1.0 },
            integration: Integration::default(),
            threads: 0,
            sweep: None,
            shift: Some(ShiftScan {
                outer: Sweep::new(SweepVar::PulseWidth, Range::new(1.0, 6.0, 0.05)),
                window: Window::new(100, 5e-7),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const RAMSEY: &str = r#"
        [physics]
        w0 = 183.247172
        field = "linear"
        phase = 0.25

        [sequence]
        kind = "ramsey"
        pulse_time = 4.286
        precess_time = 180.0

        [sweep]
        var = "frequency"
        start = 180.0
        stop = 186.0
        step = 0.5
    "#;

    #[test]
    fn parse_ramsey_fringe() {
        let config = Config::from_toml_str(RAMSEY).unwrap();
        assert_eq!(config.physics.field, FieldType::Linear);
        assert_eq!(config.physics.phase, 0.25);
        assert_eq!(config.integration.step, RK_STEP_REF);
        assert_eq!(config.threads, 0);
        assert_eq!(
            config.sequence,
            Sequence::Ramsey { pulse_time: 4.286, precess_time: 180.0 },
        );
        let sweep = config.require_sweep().unwrap();
        assert_eq!(sweep.var, SweepVar::Frequency);
        assert_eq!(sweep.values().unwrap().len(), 13);
        assert!(config.require_shift().is_err());
    }

    #[test]
    fn unknown_fields_and_selectors_are_rejected() {
        let bad_field = RAMSEY.replace("\"linear\"", "\"elliptical\"");
        assert!(matches!(
            Config::from_toml_str(&bad_field),
            Err(Error::Config(_)),
        ));
        let typo = RAMSEY.replace("phase = 0.25", "phse = 0.25");
        assert!(Config::from_toml_str(&typo).is_err());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        for config in [
            Config::rabi_default(),
            Config::ramsey_default(),
            Config::shift_phase_default(),
            Config::shift_width_default(),
        ] {
            let text = config.to_toml_string().unwrap();
            assert_eq!(Config::from_toml_str(&text).unwrap(), config);
        }
    }

    #[test]
    fn fringe_names_follow_sequence_and_sweep() {
        assert_eq!(
            Config::ramsey_default().fringe_name(SweepVar::Frequency), "circRamsey");
        assert_eq!(
            Config::shift_phase_default().fringe_name(SweepVar::Phase), "linRamseyPhase");
        assert_eq!(
            Config::rabi_default().fringe_name(SweepVar::Frequency), "circRabi");
        assert_eq!(
            Config::shift_width_default().fringe_name(SweepVar::PulseWidth),
            "linRabiPulseWidth",
        );
    }

    #[test]
    fn amplitude_follows_pulse_area() {
        let physics = Config::shift_phase_default().physics;
        let params = physics.field_params(std::f64::consts::FRAC_PI_2, PULSE_TIME_REF);
        // linear π/2 pulse: ω_RF T = π
        assert!((params.rf_amplitude * PULSE_TIME_REF - std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(params.frequency, W0_REF);

        let fixed = Physics { rf_amplitude: Some(0.73), ..physics };
        assert_eq!(fixed.field_params(1.0, 1.0).rf_amplitude, 0.73);
    }
}
