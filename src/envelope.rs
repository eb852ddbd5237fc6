//! Envelope Model
//!
//! Pure amplitude math for the two-segment (attack/decay) envelope. Time runs
//! on a normalized axis [0, 100]; amplitude rises linearly 0→1 over the attack
//! segment, then falls linearly 1→0 over the decay segment. No state, no I/O:
//! [`compute_sample`] is deterministic and total over all real inputs.

use serde::{Deserialize, Serialize};

/// User-facing envelope breakpoints, both on the [0, 100] time axis.
///
/// The decay breakpoint is allowed to sit before the attack breakpoint in the
/// stored values; consumers must go through [`EnvelopeParams::effective_decay`]
/// which forces decay to never precede attack. The stored user input is left
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeParams {
    /// Attack breakpoint: time at which amplitude reaches 1.0.
    pub attack: f64,
    /// Decay breakpoint: time at which amplitude returns to 0.0.
    pub decay: f64,
}

impl EnvelopeParams {
    pub fn new(attack: f64, decay: f64) -> Self {
        Self { attack, decay }
    }

    /// Decay breakpoint with the ordering invariant applied: never before
    /// the attack breakpoint.
    pub fn effective_decay(&self) -> f64 {
        self.decay.max(self.attack)
    }

    /// Sample the envelope at time cursor `t`.
    pub fn sample(&self, t: f64) -> AmplitudeSample {
        compute_sample(self.attack, self.decay, t)
    }
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self {
            attack: 20.0,
            decay: 100.0,
        }
    }
}

/// Instantaneous envelope state at one time cursor position.
///
/// All three fields are in [0, 1]. At most one of `norm_attack` / `norm_decay`
/// is nonzero: they report segment-local progress for whichever segment the
/// cursor is inside, and 0.0 for the other (and for both when the cursor is
/// outside the envelope entirely).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AmplitudeSample {
    pub norm_attack: f64,
    pub norm_decay: f64,
    pub amplitude: f64,
}

impl AmplitudeSample {
    /// The sample outside both segments: everything at zero.
    pub const SILENT: Self = Self {
        norm_attack: 0.0,
        norm_decay: 0.0,
        amplitude: 0.0,
    };
}

/// Compute the amplitude and segment progress for time cursor `t`.
///
/// Segment selection, in priority order:
///
/// 1. `attack > 0 && t <= attack`: attack segment, amplitude = t/attack.
/// 2. decay segment exists and `attack <= t <= effective decay`:
///    amplitude = 1 - (t - attack)/(decay - attack).
/// 3. otherwise silence.
///
/// Inputs are not trusted to be in range: ratios are clamped to [0, 1], every
/// division sits behind a strictly-positive-denominator guard, and non-finite
/// inputs fall through to the silent branch. A zero-width decay (decay <=
/// attack) is never entered, and the breakpoint itself reads as silent.
pub fn compute_sample(attack: f64, decay: f64, t: f64) -> AmplitudeSample {
    let eff_decay = decay.max(attack);
    let has_decay = eff_decay > attack;

    if attack > 0.0 && t <= attack && (has_decay || t < attack) {
        let norm_attack = (t / attack).clamp(0.0, 1.0);
        AmplitudeSample {
            norm_attack,
            norm_decay: 0.0,
            amplitude: norm_attack,
        }
    } else if has_decay && t >= attack && t <= eff_decay {
        let norm_decay = ((t - attack) / (eff_decay - attack)).clamp(0.0, 1.0);
        AmplitudeSample {
            norm_attack: 0.0,
            norm_decay,
            amplitude: 1.0 - norm_decay,
        }
    } else {
        AmplitudeSample::SILENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn attack_ramp_is_linear_and_monotone() {
        let mut prev = -1.0;
        for i in 0..=20 {
            let t = i as f64;
            let s = compute_sample(20.0, 100.0, t);
            assert_relative_eq!(s.amplitude, t / 20.0);
            assert_relative_eq!(s.norm_attack, s.amplitude);
            assert_relative_eq!(s.norm_decay, 0.0);
            assert!(s.amplitude >= prev);
            prev = s.amplitude;
        }
    }

    #[test]
    fn decay_ramp_is_linear_and_monotone() {
        let mut prev = 2.0;
        for i in 21..=100 {
            let t = i as f64;
            let s = compute_sample(20.0, 100.0, t);
            assert_relative_eq!(s.amplitude, 1.0 - (t - 20.0) / 80.0);
            assert_relative_eq!(s.norm_decay, (t - 20.0) / 80.0);
            assert_relative_eq!(s.norm_attack, 0.0);
            assert!(s.amplitude <= prev);
            prev = s.amplitude;
        }
    }

    #[test]
    fn decay_endpoints() {
        // t = attack hits the attack branch first, same value either way.
        assert_relative_eq!(compute_sample(30.0, 70.0, 30.0).amplitude, 1.0);
        assert_relative_eq!(compute_sample(30.0, 70.0, 70.0).amplitude, 0.0);
        assert_relative_eq!(compute_sample(30.0, 70.0, 70.0).norm_decay, 1.0);
    }

    #[test]
    fn scenario_table() {
        // A=20, D=100 reference points.
        let s = compute_sample(20.0, 100.0, 20.0);
        assert_relative_eq!(s.norm_attack, 1.0);
        assert_relative_eq!(s.amplitude, 1.0);

        let s = compute_sample(20.0, 100.0, 60.0);
        assert_relative_eq!(s.norm_decay, 0.5);
        assert_relative_eq!(s.amplitude, 0.5);

        let s = compute_sample(20.0, 100.0, 150.0);
        assert_eq!(s, AmplitudeSample::SILENT);
    }

    #[test]
    fn zero_width_decay_is_silent_at_the_breakpoint() {
        for t in [0.0, 25.0, 49.9, 50.0, 50.1, 100.0] {
            let s = compute_sample(50.0, 50.0, t);
            if t < 50.0 {
                assert_relative_eq!(s.amplitude, t / 50.0);
            } else {
                assert_eq!(s, AmplitudeSample::SILENT);
            }
        }
        // Decay before attack is forced to a zero-width decay.
        assert_eq!(compute_sample(50.0, 10.0, 50.0), AmplitudeSample::SILENT);
        assert_eq!(compute_sample(50.0, 10.0, 60.0), AmplitudeSample::SILENT);
    }

    #[test]
    fn zero_attack_skips_the_attack_branch() {
        // With attack = 0 the rise is instantaneous: the decay segment owns
        // every in-range t, starting at full amplitude.
        let s = compute_sample(0.0, 100.0, 0.0);
        assert_relative_eq!(s.amplitude, 1.0);
        assert_relative_eq!(s.norm_attack, 0.0);
        assert_relative_eq!(s.norm_decay, 0.0);

        let s = compute_sample(0.0, 100.0, 50.0);
        assert_relative_eq!(s.amplitude, 0.5);
        assert_relative_eq!(s.norm_attack, 0.0);

        // Fully degenerate: both breakpoints at zero.
        assert_eq!(compute_sample(0.0, 0.0, 0.0), AmplitudeSample::SILENT);
    }

    #[test]
    fn hostile_inputs_never_panic_and_stay_in_range() {
        for (a, d, t) in [
            (-10.0, 50.0, 25.0),
            (20.0, 100.0, -5.0),
            (f64::NAN, 100.0, 50.0),
            (20.0, f64::NAN, 10.0),
            (20.0, 100.0, f64::NAN),
            (f64::INFINITY, 100.0, 50.0),
            (20.0, f64::INFINITY, 50.0),
        ] {
            let s = compute_sample(a, d, t);
            for v in [s.norm_attack, s.norm_decay, s.amplitude] {
                assert!((0.0..=1.0).contains(&v), "{v} out of range for ({a}, {d}, {t})");
            }
        }
        // Negative t inside a positive attack clamps to the segment start.
        assert_relative_eq!(compute_sample(20.0, 100.0, -5.0).amplitude, 0.0);
    }

    #[test]
    fn pure_function_is_idempotent() {
        let a = compute_sample(33.3, 66.6, 40.0);
        let b = compute_sample(33.3, 66.6, 40.0);
        assert_eq!(a, b);
    }

    #[test]
    fn params_apply_ordering_invariant_without_mutation() {
        let p = EnvelopeParams::new(60.0, 20.0);
        assert_relative_eq!(p.effective_decay(), 60.0);
        // User input is preserved, only the derived value is ordered.
        assert_relative_eq!(p.decay, 20.0);
    }
}
