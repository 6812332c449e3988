//! Peer connection lifecycle and the readiness barrier.
//!
//! [`PeerSession`] tracks everything about the single remote peer that is not
//! round state: the connection phase, the exchanged display names, the two
//! readiness flags, and the health of the optional media stream. It owns no
//! socket; the transport collaborator reports transitions (channel opened,
//! channel closed) and the session records them.
//!
//! The readiness barrier is commutative. `ready` announcements and local
//! readiness can arrive in either order, and the barrier is satisfied exactly
//! when both flags are set, so message-arrival races cannot deadlock the
//! handshake.

use web_time::{Duration, Instant};

use crate::error::ArenaError;

/// The connection phase of the remote peer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PeerSessionState {
    /// No connection attempt is in flight.
    Disconnected,
    /// Dialing: waiting for the transport to open the channel.
    Connecting,
    /// The reliable channel is open; names and readiness are being exchanged.
    Connected,
    /// Both readiness flags are set; the host may start the match.
    BothReady,
    /// A match is running over this connection.
    Active,
    /// The channel was closed or lost. Terminal for this session.
    Closed,
}

/// State of the connection to the single remote peer.
#[derive(Debug, Clone)]
pub struct PeerSession {
    state: PeerSessionState,
    local_name: String,
    opponent_name: Option<String>,
    local_ready: bool,
    opponent_ready: bool,
    connect_started: Option<Instant>,
    connect_timeout: Duration,
    media_degraded: bool,
}

impl PeerSession {
    /// Creates a disconnected session for a peer we have not dialed yet.
    #[must_use]
    pub fn new(local_name: String, connect_timeout: Duration) -> Self {
        Self {
            state: PeerSessionState::Disconnected,
            local_name,
            opponent_name: None,
            local_ready: false,
            opponent_ready: false,
            connect_started: None,
            connect_timeout,
            media_degraded: false,
        }
    }

    /// The current connection phase.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> PeerSessionState {
        self.state
    }

    /// The local player's display name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// The opponent's display name, once announced.
    #[must_use]
    pub fn opponent_name(&self) -> Option<&str> {
        self.opponent_name.as_deref()
    }

    /// Whether the best-effort media stream has degraded.
    #[inline]
    #[must_use]
    pub const fn media_degraded(&self) -> bool {
        self.media_degraded
    }

    /// Whether the readiness barrier is satisfied.
    #[inline]
    #[must_use]
    pub const fn both_ready(&self) -> bool {
        self.local_ready && self.opponent_ready
    }

    /// Records the start of a connection attempt at `now`.
    ///
    /// The timestamp anchors [`PeerSession::check_connect_timeout`].
    pub fn begin_connect(&mut self, now: Instant) {
        self.state = PeerSessionState::Connecting;
        self.connect_started = Some(now);
    }

    /// Checks whether a pending connection attempt has exceeded its bound.
    ///
    /// A no-op unless the session is still `Connecting`; once the channel is
    /// open or closed the deadline no longer applies. On timeout the session
    /// moves to `Closed` and the error reports how long it waited.
    pub fn check_connect_timeout(&mut self, now: Instant) -> Result<(), ArenaError> {
        if self.state != PeerSessionState::Connecting {
            return Ok(());
        }
        let Some(started) = self.connect_started else {
            return Ok(());
        };
        let waited = now.saturating_duration_since(started);
        if waited < self.connect_timeout {
            return Ok(());
        }
        self.state = PeerSessionState::Closed;
        Err(ArenaError::ConnectTimeout {
            waited_ms: waited.as_millis() as u64,
        })
    }

    /// Records that the transport opened the reliable channel.
    pub fn channel_open(&mut self) {
        if self.state == PeerSessionState::Closed {
            return;
        }
        self.state = PeerSessionState::Connected;
        self.connect_started = None;
    }

    /// Records the opponent's announced display name.
    pub fn set_opponent_name(&mut self, name: String) {
        self.opponent_name = Some(name);
    }

    /// Sets the local half of the readiness barrier.
    ///
    /// Returns `true` if this call completed the barrier.
    pub fn mark_local_ready(&mut self) -> bool {
        self.local_ready = true;
        self.update_readiness()
    }

    /// Sets the remote half of the readiness barrier.
    ///
    /// Returns `true` if this call completed the barrier.
    pub fn mark_opponent_ready(&mut self) -> bool {
        self.opponent_ready = true;
        self.update_readiness()
    }

    fn update_readiness(&mut self) -> bool {
        if self.state == PeerSessionState::Connected && self.both_ready() {
            self.state = PeerSessionState::BothReady;
            return true;
        }
        false
    }

    /// Moves the connection into the in-match phase.
    ///
    /// Requires a satisfied readiness barrier.
    pub fn activate(&mut self) -> Result<(), ArenaError> {
        if self.state != PeerSessionState::BothReady {
            return Err(ArenaError::NotReady);
        }
        self.state = PeerSessionState::Active;
        Ok(())
    }

    /// Records that the channel closed. Returns the state it closed from.
    pub fn close(&mut self) -> PeerSessionState {
        let previous = self.state;
        self.state = PeerSessionState::Closed;
        previous
    }

    /// Records a degradation of the best-effort media stream. Game logic is
    /// unaffected.
    pub fn set_media_degraded(&mut self) {
        self.media_degraded = true;
    }
}
