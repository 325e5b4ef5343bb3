//! Pulse sequences run once per scan point.

use std::f64::consts::{ FRAC_PI_2, PI };
use serde::{ Deserialize, Serialize };
use neutron_sim::{
    FieldParams,
    FreePrecession,
    Operation,
    Pulse,
    StateVector,
};
use crate::error::Result;

/// A pulse sequence applied to a neutron that starts spin up.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum Sequence {
    /// A single π pulse.
    Rabi {
        /// Pulse width (s).
        pulse_time: f64,
    },
    /// Two π/2 pulses separated by a period of free precession.
    Ramsey {
        /// Width of each pulse (s).
        pulse_time: f64,
        /// Free precession time between the pulses (s).
        precess_time: f64,
    },
}

impl Sequence {
    /// Width of each pulse.
    pub fn pulse_time(&self) -> f64 {
        match *self {
            Self::Rabi { pulse_time } => pulse_time,
            Self::Ramsey { pulse_time, .. } => pulse_time,
        }
    }

    /// Return a copy with a different pulse width.
    pub fn with_pulse_time(self, pulse_time: f64) -> Self {
        match self {
            Self::Rabi { .. } => Self::Rabi { pulse_time },
            Self::Ramsey { precess_time, .. }
                => Self::Ramsey { pulse_time, precess_time },
        }
    }

    /// On-resonance rotation angle each pulse is meant to produce.
    pub fn pulse_area(&self) -> f64 {
        match self {
            Self::Rabi { .. } => PI,
            Self::Ramsey { .. } => FRAC_PI_2,
        }
    }

    /// Lay out the sequence as a list of operations, `params` describing the
    /// first pulse.
    ///
    /// The second Ramsey pulse picks up the drive phase accumulated over the
    /// first pulse and the precession gap, `φ₂ = ω T + φ + ω τ`, so that the
    /// drive is phase-continuous as if it had never been switched off.
    pub fn operations(&self, params: FieldParams, step: f64) -> Vec<Operation> {
        match *self {
            Self::Rabi { pulse_time } => {
                vec![Pulse::new(params, pulse_time, step).into()]
            },
            Self::Ramsey { pulse_time, precess_time } => {
                let first = Pulse::new(params, pulse_time, step);
                let phase2
                    = first.end_phase() + params.frequency * precess_time;
                let second = Pulse::new(params.with_phase(phase2), pulse_time, step);
                vec![
                    first.into(),
                    FreePrecession::new(precess_time, params.w0).into(),
                    second.into(),
                ]
            },
        }
    }

    /// Run the sequence on a fresh spin-up neutron and return its final state.
    pub fn run(&self, params: FieldParams, step: f64) -> Result<StateVector> {
        let mut ucn = StateVector::default();
        ucn.apply_all(&self.operations(params, step))?;
        Ok(ucn)
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;
    use neutron_sim::FieldType;
    use super::*;

    #[test]
    fn ramsey_layout() {
        let seq = Sequence::Ramsey { pulse_time: 4.286, precess_time: 180.0 };
        let params = FieldParams::new(183.0, 183.2, 0.3, 0.5, FieldType::Linear);
        let ops = seq.operations(params, 0.001);
        assert_eq!(ops.len(), 3);
        match (&ops[0], &ops[1], &ops[2]) {
            (Operation::Pulse(p1), Operation::Precess(f), Operation::Pulse(p2)) => {
                assert_eq!(p1.params, params);
                assert_eq!(f.w0, 183.2);
                assert_eq!(f.duration, 180.0);
                assert_abs_diff_eq!(
                    p2.params.phase,
                    183.0 * 4.286 + 0.5 + 183.0 * 180.0,
                    epsilon = 1e-9,
                );
                assert_eq!(p2.duration, 4.286);
            },
            _ => panic!("unexpected layout {:?}", ops),
        }
    }

    #[test]
    fn pulse_time_and_area() {
        let rabi = Sequence::Rabi { pulse_time: 2.0 };
        assert_eq!(rabi.pulse_area(), PI);
        assert_eq!(rabi.with_pulse_time(3.0).pulse_time(), 3.0);
        let ramsey = Sequence::Ramsey { pulse_time: 1.0, precess_time: 10.0 };
        assert_eq!(ramsey.pulse_area(), FRAC_PI_2);
        assert_eq!(
            ramsey.with_pulse_time(2.0),
            Sequence::Ramsey { pulse_time: 2.0, precess_time: 10.0 },
        );
    }

    #[test]
    fn resonant_sequences_flip() {
        for seq in [
            Sequence::Rabi { pulse_time: 2.0 },
            Sequence::Ramsey { pulse_time: 1.0, precess_time: 10.0 },
        ] {
            let w_rf = FieldType::Circular.amplitude_for(seq.pulse_area(), seq.pulse_time());
            let params = FieldParams::new(20.0, 20.0, w_rf, 0.0, FieldType::Circular);
            let ucn = seq.run(params, 0.001).unwrap();
            assert!(ucn.z_prob() < 1e-6, "{:?}: {}", seq, ucn.z_prob());
        }
    }

    #[test]
    fn bad_step_is_reported() {
        let seq = Sequence::Rabi { pulse_time: 2.0005 };
        let params = FieldParams::new(20.0, 20.0, 1.0, 0.0, FieldType::Circular);
        assert!(seq.run(params, 0.001).is_err());
    }
}
