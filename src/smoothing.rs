//! Exponential smoothing for raw expression-confidence streams.
//!
//! The perception oracle emits a noisy per-emotion confidence roughly every
//! 80 ms. Win checks run on a smoothed value so a single spurious detection
//! frame cannot decide a round. The filter is the classic exponential moving
//! average: `previous * (1 - factor) + raw * factor`.
//!
//! One smoothed channel exists per round and MUST start at zero: carrying a
//! smoothed value across rounds would bias the next round's opening seconds.
//! Round setup therefore constructs a fresh [`SmoothedSignal`] rather than
//! reusing the previous round's.

use crate::Confidence;

/// Applies one exponential smoothing step.
///
/// Pure and stateless: `previous * (1 - factor) + raw * factor`. The caller
/// guarantees `previous` and `raw` lie in `[0, 1]` and `factor` in `(0, 1)`;
/// the result then also lies in `[0, 1]` (it is a convex combination).
///
/// # Examples
///
/// ```
/// use emotion_arena::smoothing::smooth;
///
/// let next = smooth(0.0, 1.0, 0.35);
/// assert!((next - 0.35).abs() < f32::EPSILON);
/// ```
#[inline]
#[must_use]
pub fn smooth(previous: f32, raw: f32, factor: f32) -> f32 {
    previous * (1.0 - factor) + raw * factor
}

/// One smoothed confidence channel, scoped to a single round.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedSignal {
    value: Confidence,
    factor: f32,
}

impl SmoothedSignal {
    /// Creates a zeroed channel with the given smoothing factor.
    #[must_use]
    pub const fn new(factor: f32) -> Self {
        Self {
            value: Confidence::ZERO,
            factor,
        }
    }

    /// Feeds one raw oracle sample and returns the new smoothed value.
    ///
    /// The raw sample is clamped into `[0, 1]` before smoothing, so a
    /// misbehaving oracle cannot push the channel out of range.
    pub fn update(&mut self, raw: f32) -> Confidence {
        let clamped = Confidence::new(raw);
        self.value = Confidence::new(smooth(self.value.as_f32(), clamped.as_f32(), self.factor));
        self.value
    }

    /// The current smoothed value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> Confidence {
        self.value
    }
}
