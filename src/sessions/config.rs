//! Match tuning knobs.

use web_time::Duration;

use crate::error::ArenaError;

/// Every tunable the match logic reads. Defaults are the shipped game's
/// values; construct with struct-update syntax to override a subset:
///
/// ```
/// use emotion_arena::MatchConfig;
///
/// let config = MatchConfig {
///     rounds_to_win: 3,
///     ..MatchConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Interval between perception samples fed to the smoother.
    pub perception_tick: Duration,
    /// Exponential smoothing factor, in `(0, 1)`. Higher reacts faster.
    pub smoothing_factor: f32,
    /// Smoothed confidence a player must reach to win a round, in `(0, 1]`.
    pub win_threshold: f32,
    /// Round length in whole seconds of round-clock ticks.
    pub round_time_limit: u32,
    /// Round wins needed to take the match.
    pub rounds_to_win: u32,
    /// Pre-round countdown length in ticks. Runs before every round.
    pub countdown_ticks: u32,
    /// Pause between a round resolving and the host advancing to the next.
    pub next_round_delay: Duration,
    /// How long a joiner waits for the channel to open before giving up.
    pub connect_timeout: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            perception_tick: Duration::from_millis(80),
            smoothing_factor: 0.35,
            win_threshold: 0.99,
            round_time_limit: 15,
            rounds_to_win: 5,
            countdown_ticks: 3,
            next_round_delay: Duration::from_secs(3),
            connect_timeout: Duration::from_secs(20),
        }
    }
}

impl MatchConfig {
    /// Checks the invariants the session logic assumes.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidRequest`] naming the first offending knob.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if !self.smoothing_factor.is_finite()
            || self.smoothing_factor <= 0.0
            || self.smoothing_factor >= 1.0
        {
            return Err(ArenaError::InvalidRequest {
                info: format!(
                    "smoothing_factor must lie in (0, 1), got {}",
                    self.smoothing_factor
                ),
            });
        }
        if !self.win_threshold.is_finite() || self.win_threshold <= 0.0 || self.win_threshold > 1.0
        {
            return Err(ArenaError::InvalidRequest {
                info: format!(
                    "win_threshold must lie in (0, 1], got {}",
                    self.win_threshold
                ),
            });
        }
        if self.round_time_limit == 0 {
            return Err(ArenaError::InvalidRequest {
                info: "round_time_limit must be nonzero".to_owned(),
            });
        }
        if self.rounds_to_win == 0 {
            return Err(ArenaError::InvalidRequest {
                info: "rounds_to_win must be nonzero".to_owned(),
            });
        }
        if self.countdown_ticks == 0 {
            return Err(ArenaError::InvalidRequest {
                info: "countdown_ticks must be nonzero".to_owned(),
            });
        }
        if self.perception_tick.is_zero() {
            return Err(ArenaError::InvalidRequest {
                info: "perception_tick must be nonzero".to_owned(),
            });
        }
        if self.connect_timeout.is_zero() {
            return Err(ArenaError::InvalidRequest {
                info: "connect_timeout must be nonzero".to_owned(),
            });
        }
        Ok(())
    }
}
