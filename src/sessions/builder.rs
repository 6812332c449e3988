//! Session construction.

use crate::error::ArenaError;
use crate::rng::Pcg32;
use crate::room_code::RoomCode;
use crate::sessions::config::MatchConfig;
use crate::sessions::match_session::MatchSession;
use crate::Role;

/// Display name used when the embedder configures none.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Builds [`MatchSession`]s for the three roles.
///
/// # Examples
///
/// ```
/// use emotion_arena::{MatchConfig, SessionBuilder};
///
/// let host = SessionBuilder::new()
///     .with_local_name("Ada")
///     .with_config(MatchConfig {
///         rounds_to_win: 3,
///         ..MatchConfig::default()
///     })
///     .start_host_session()
///     .expect("config is valid");
/// let code = host.room_code().expect("hosts always have a code");
///
/// let joiner = SessionBuilder::new()
///     .with_local_name("Grace")
///     .start_joiner_session(code.as_str())
///     .expect("code parses");
/// # let _ = joiner;
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    config: MatchConfig,
    local_name: String,
    seed: Option<u64>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    /// Creates a builder with the default configuration and player name.
    pub fn new() -> Self {
        Self {
            config: MatchConfig::default(),
            local_name: DEFAULT_PLAYER_NAME.to_owned(),
            seed: None,
        }
    }

    /// Replaces the match configuration.
    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the local player's display name. Whitespace-only input falls
    /// back to the default name.
    pub fn with_local_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        self.local_name = if trimmed.is_empty() {
            DEFAULT_PLAYER_NAME.to_owned()
        } else {
            trimmed.to_owned()
        };
        self
    }

    /// Seeds the session's RNG for deterministic emotion selection, room
    /// codes, and solo-opponent simulation. Unseeded sessions draw entropy
    /// from the system clock.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds a host session with a freshly generated room code.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidRequest`] for an invalid configuration.
    pub fn start_host_session(self) -> Result<MatchSession, ArenaError> {
        self.config.validate()?;
        let mut rng = self.rng();
        let code = RoomCode::generate(&mut rng);
        Ok(MatchSession::new(
            Role::Host,
            self.config,
            self.local_name,
            Some(code),
            rng,
        ))
    }

    /// Builds a joiner session for the given room code.
    ///
    /// The code is normalized (trimmed and uppercased) before validation, so
    /// input can be passed straight from a text field.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::InvalidRoomCode`] if the code does not normalize to
    ///   six alphabet characters.
    /// - [`ArenaError::InvalidRequest`] for an invalid configuration.
    pub fn start_joiner_session(self, code: &str) -> Result<MatchSession, ArenaError> {
        self.config.validate()?;
        let code: RoomCode = code.parse()?;
        let rng = self.rng();
        Ok(MatchSession::new(
            Role::Joiner,
            self.config,
            self.local_name,
            Some(code),
            rng,
        ))
    }

    /// Builds a solo session with a simulated opponent and no peer.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidRequest`] for an invalid configuration.
    pub fn start_solo_session(self) -> Result<MatchSession, ArenaError> {
        self.config.validate()?;
        let rng = self.rng();
        Ok(MatchSession::new(
            Role::Solo,
            self.config,
            self.local_name,
            None,
            rng,
        ))
    }

    fn rng(&self) -> Pcg32 {
        match self.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_entropy(),
        }
    }
}
