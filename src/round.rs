//! Round-local state: the countdown of seconds, the two confidence channels,
//! and the write-once winner slot.
//!
//! A `RoundState` is created at round start and discarded when the round
//! resolves; it is never reused, which is what guarantees the smoothed
//! channels start from zero each round. Authority decisions (who may resolve,
//! when to broadcast) live in the session; this type only enforces the
//! round-local invariants: the winner is set at most once, and ticks and
//! value updates after resolution are ignored.

use crate::smoothing::SmoothedSignal;
use crate::{Confidence, RoundVerdict};

/// State for one round in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    time_remaining: u32,
    local: SmoothedSignal,
    opponent_value: Confidence,
    winner: Option<RoundVerdict>,
}

impl RoundState {
    /// Creates a fresh round with both channels at zero.
    #[must_use]
    pub const fn new(time_limit: u32, smoothing_factor: f32) -> Self {
        Self {
            time_remaining: time_limit,
            local: SmoothedSignal::new(smoothing_factor),
            opponent_value: Confidence::ZERO,
            winner: None,
        }
    }

    /// Feeds a raw local perception sample through the smoother.
    ///
    /// Returns the new smoothed value, or `None` if the round has already
    /// resolved (late perception ticks are ignored, not an error).
    pub fn report_local(&mut self, raw: f32) -> Option<Confidence> {
        if self.winner.is_some() {
            return None;
        }
        Some(self.local.update(raw))
    }

    /// Applies the opponent's reported smoothed value.
    ///
    /// The opponent smooths on its own side; received values are stored
    /// as-is (clamped by [`Confidence`] deserialization/construction).
    pub fn apply_remote(&mut self, value: Confidence) {
        if self.winner.is_some() {
            return;
        }
        self.opponent_value = value;
    }

    /// Decrements the round clock by one second.
    ///
    /// Returns the remaining time. A resolved round does not tick.
    pub fn tick(&mut self) -> u32 {
        if self.winner.is_none() {
            self.time_remaining = self.time_remaining.saturating_sub(1);
        }
        self.time_remaining
    }

    /// Seconds left on the round clock.
    #[inline]
    #[must_use]
    pub const fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// The local player's current smoothed value.
    #[inline]
    #[must_use]
    pub const fn local_value(&self) -> Confidence {
        self.local.value()
    }

    /// The opponent's last reported value.
    #[inline]
    #[must_use]
    pub const fn opponent_value(&self) -> Confidence {
        self.opponent_value
    }

    /// The verdict, if the round has resolved.
    #[inline]
    #[must_use]
    pub const fn winner(&self) -> Option<RoundVerdict> {
        self.winner
    }

    /// Sets the verdict. Returns `true` if this call resolved the round,
    /// `false` if a winner was already set (the verdict is immutable once
    /// written).
    pub fn resolve(&mut self, verdict: RoundVerdict) -> bool {
        if self.winner.is_some() {
            return false;
        }
        self.winner = Some(verdict);
        true
    }

    /// The verdict a timed-out round resolves to: strictly greater value
    /// wins, exact equality is a draw, never an arbitrary winner.
    #[must_use]
    pub fn timeout_verdict(&self) -> RoundVerdict {
        let local = self.local.value();
        let opponent = self.opponent_value;
        if local > opponent {
            RoundVerdict::Local
        } else if opponent > local {
            RoundVerdict::Opponent
        } else {
            RoundVerdict::Draw
        }
    }
}
