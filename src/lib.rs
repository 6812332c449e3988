//! # Emotion Arena
//!
//! Emotion Arena is the match-synchronization core of a two-player real-time
//! game in which both players perform a target facial expression; the first
//! player whose smoothed confidence reaches the configured threshold wins the
//! round. This crate contains the round/match state machine, the host/joiner
//! wire protocol, the readiness handshake, and the host-authoritative win
//! determination, and nothing else. Face detection, rendering, camera
//! acquisition, and the peer transport itself are external collaborators.
//!
//! The design is strictly two-peer and host-authoritative: the host owns
//! emotion selection, score updates, round advancement, and match termination.
//! The joiner mirrors host-broadcast state and never evaluates a win locally,
//! which rules out split-brain outcomes under network skew.
//!
//! There are no live timers or sockets inside the crate. A [`MatchSession`] is
//! a transition machine: the embedder feeds it inbound [`Message`]s,
//! perception ticks, and clock ticks, then drains outbound messages into its
//! [`ReliableChannel`] and user-facing [`ArenaEvent`]s from
//! [`MatchSession::events`]. Every timer-driven entry point takes a
//! [`Generation`] token so a tick scheduled for a round that has since been
//! torn down is provably a no-op.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};

pub use emotion::{Emotion, EmotionSelector};
pub use error::{ArenaError, TransportErrorKind};
pub use network::messages::{Message, ScorePair, WireWinner};
pub use network::peer_session::{PeerSession, PeerSessionState};
pub use room_code::RoomCode;
pub use sessions::builder::SessionBuilder;
pub use sessions::config::MatchConfig;
pub use sessions::event_drain::EventDrain;
pub use sessions::match_session::MatchSession;

pub use clock::Generation;

pub mod clock;
pub mod emotion;
#[doc(hidden)]
pub mod error;
/// Internal random number generator module based on PCG32.
///
/// Provides a minimal, high-quality PRNG that replaces a `rand` crate
/// dependency for emotion selection, room codes, and the solo opponent.
pub mod rng;
pub mod room_code;
pub mod round;
pub mod smoothing;
#[doc(hidden)]
pub mod network {
    /// Binary codec for protocol message serialization.
    pub mod codec;
    #[doc(hidden)]
    pub mod messages;
    #[doc(hidden)]
    pub mod peer_session;
}
#[doc(hidden)]
pub mod sessions {
    #[doc(hidden)]
    pub mod builder;
    #[doc(hidden)]
    pub mod config;
    #[doc(hidden)]
    pub mod event_drain;
    #[doc(hidden)]
    pub mod match_session;
}

// #############
// # CONSTANTS #
// #############

/// Number of players in a match. The protocol is strictly two-peer.
pub const NUM_PLAYERS: usize = 2;

/// A smoothed expression-confidence value, guaranteed to lie in `[0.0, 1.0]`.
///
/// Confidence values originate from an external perception oracle that
/// estimates how strongly a face shows a given expression. The raw stream is
/// noisy; the values carried by this type have been through the
/// [`smoothing`] filter (or are clamped raw inputs).
///
/// # Type Safety
///
/// `Confidence` is a newtype wrapper around `f32` that provides:
/// - A clamped constructor, so out-of-range transport data cannot leak into
///   win checks
/// - Clear semantic meaning (confidence vs arbitrary floats)
///
/// # Examples
///
/// ```
/// use emotion_arena::Confidence;
///
/// let c = Confidence::new(0.42);
/// assert_eq!(c.as_f32(), 0.42);
///
/// // Out-of-range input is clamped, never propagated.
/// assert_eq!(Confidence::new(1.7), Confidence::ONE);
/// assert_eq!(Confidence::new(-0.3), Confidence::ZERO);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Confidence(f32);

impl Confidence {
    /// Zero confidence. Every round starts both channels here.
    pub const ZERO: Confidence = Confidence(0.0);

    /// Full confidence.
    pub const ONE: Confidence = Confidence(1.0);

    /// Creates a new `Confidence`, clamping the value into `[0.0, 1.0]`.
    ///
    /// Non-finite input collapses to zero.
    #[inline]
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Confidence(value.clamp(0.0, 1.0))
        } else {
            Confidence::ZERO
        }
    }

    /// Returns the underlying `f32` value.
    #[inline]
    #[must_use]
    pub const fn as_f32(self) -> f32 {
        self.0
    }

    /// Returns the value as a whole-number percentage, rounded.
    #[inline]
    #[must_use]
    pub fn as_percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

// #############
// #   ENUMS   #
// #############

/// The role a session plays for the lifetime of a match.
///
/// The host (and the solo player, who hosts a simulated opponent) is
/// authoritative: it alone selects emotions, decides round winners, updates
/// scores, and terminates the match. The joiner mirrors broadcast state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// The authoritative peer. Owns scores, emotion selection, and round and
    /// match progression decisions.
    Host,
    /// The non-authoritative peer. Mirrors host-broadcast state and performs
    /// no win evaluation of its own.
    Joiner,
    /// Single-player mode: authoritative like a host, with a synthetic
    /// opponent driven by the session's RNG instead of a remote peer.
    Solo,
}

impl Role {
    /// Returns `true` if this role decides winners and advances the match.
    #[inline]
    #[must_use]
    pub const fn is_authoritative(self) -> bool {
        !matches!(self, Role::Joiner)
    }
}

/// The phase of a match. You can query it via [`MatchSession::phase`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatchPhase {
    /// No match is running.
    Idle,
    /// The pre-round countdown is ticking. Both peers run it locally; no
    /// network round-trip synchronizes round start.
    Countdown,
    /// A round is active: value updates flow and the host evaluates wins.
    RoundActive,
    /// A round has resolved; the host will advance or end the match.
    RoundResolved,
    /// The match is over, by score or by disconnect.
    MatchOver,
}

/// The winner of a round, relative to the local client.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RoundVerdict {
    /// The local player won the round.
    Local,
    /// The opponent won the round.
    Opponent,
    /// Neither side reached the threshold and the timeout values were exactly
    /// equal. Draws award no points.
    Draw,
}

/// How a match ended, relative to the local client.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The local player reached the win threshold first.
    Victory,
    /// The opponent reached the win threshold first.
    Defeat,
    /// The peer channel was lost while the match was active. This is a
    /// distinct terminal outcome; no score-based winner is declared.
    OpponentLeft,
}

/// Notifications drained from a session via [`MatchSession::events`].
/// Handling them is up to the embedder (typically the UI layer).
///
/// # Forward Compatibility
///
/// This enum is marked `#[non_exhaustive]` because new event types may be
/// added in future versions. Always include a wildcard arm when matching.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ArenaEvent {
    /// An inbound peer connection was accepted (host side).
    OpponentConnected,
    /// The opponent announced its display name.
    OpponentInfo {
        /// The opponent's display name.
        name: String,
    },
    /// The opponent announced readiness.
    OpponentReady,
    /// Both sides of the readiness barrier are satisfied; the host may start
    /// the match.
    BothReady,
    /// A match started (first round of a fresh match or a rematch).
    MatchStarted {
        /// The round number, always 1 at match start.
        round: u32,
        /// The target emotion for the first round.
        emotion: Emotion,
    },
    /// The pre-round countdown advanced.
    CountdownTick {
        /// Ticks remaining before the round goes active.
        remaining: u32,
    },
    /// A round went active at local countdown completion.
    RoundStarted {
        /// The round number.
        round: u32,
        /// The target emotion for this round.
        emotion: Emotion,
    },
    /// The opponent reported a new smoothed confidence value.
    OpponentProgress {
        /// The emotion the opponent is performing.
        emotion: Emotion,
        /// The opponent's smoothed confidence.
        value: Confidence,
    },
    /// A round resolved with the given verdict and authoritative scores.
    RoundResolved {
        /// The winner, relative to the local client.
        verdict: RoundVerdict,
        /// The local player's score after the round.
        score_local: u32,
        /// The opponent's score after the round.
        score_opponent: u32,
    },
    /// The match ended.
    MatchOver {
        /// How the match ended, relative to the local client.
        outcome: MatchOutcome,
        /// The local player's final score.
        score_local: u32,
        /// The opponent's final score.
        score_opponent: u32,
    },
    /// The peer channel was lost. If a match was active a
    /// [`ArenaEvent::MatchOver`] with [`MatchOutcome::OpponentLeft`] is
    /// emitted alongside.
    OpponentDisconnected,
    /// The best-effort media stream degraded. Game logic is unaffected; the
    /// UI should fall back to a symbolic opponent display.
    MediaDegraded,
}

// #############
// #  TRAITS   #
// #############

/// The seam to the external peer-transport collaborator.
///
/// The transport delivers messages in order and reliably (the design rides on
/// a reliable data channel, not raw datagrams). NAT traversal, room
/// registration, and the optional media stream are the transport's business;
/// this crate only sends and receives [`Message`]s through it.
///
/// [`MatchSession::pump`] drives a channel: it drains inbound messages into
/// the session and flushes the session's outbox back out.
pub trait ReliableChannel {
    /// Sends a [`Message`] to the connected peer. Best-effort once the
    /// channel reports closed; the session never requires a send to succeed
    /// for local cleanup to proceed.
    fn send(&mut self, msg: &Message);

    /// Returns all messages received since the last call, in arrival order.
    fn receive_all(&mut self) -> Vec<Message>;

    /// Whether the underlying channel is currently open. A transition to
    /// `false` while a match is active surfaces as an opponent disconnect.
    fn is_open(&self) -> bool;
}

// ###################
// # UNIT TESTS      #
// ###################
