//! Generation tokens for cancellable scheduled ticks.
//!
//! The crate owns no live timers: the embedder schedules the countdown tick,
//! the round-limit tick, and the inter-round advance, and calls back into the
//! session. That leaves a hazard: a timer that fires after its round has
//! been torn down (leave, disconnect, a threshold win racing the timeout)
//! must not mutate a superseded round's state.
//!
//! Every timer-driven session entry point therefore takes a [`Generation`]
//! token minted when the tick was scheduled. Teardown advances the session's
//! [`GenerationCounter`], so a stale tick fails the generation check and is a
//! no-op by construction, not by accident of variable overwrite. This is the
//! same staleness discipline the wire protocol applies to messages from a
//! superseded peer incarnation via the header magic.

/// An opaque epoch token identifying one scheduling lifetime.
///
/// Obtain the current token from [`MatchSession::generation`] when scheduling
/// a tick, and pass it back when the tick fires. If the session has since
/// advanced its generation (round resolved, match torn down, player left),
/// the tick is ignored.
///
/// [`MatchSession::generation`]: crate::MatchSession::generation
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Generation(u64);

/// Issues and validates [`Generation`] tokens. One per session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationCounter {
    current: u64,
}

impl GenerationCounter {
    /// Creates a counter at generation zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { current: 0 }
    }

    /// Returns the current generation token.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> Generation {
        Generation(self.current)
    }

    /// Advances to a new generation, invalidating every outstanding token.
    ///
    /// Returns the new current token.
    #[inline]
    pub fn advance(&mut self) -> Generation {
        self.current = self.current.wrapping_add(1);
        Generation(self.current)
    }

    /// Returns `true` if `token` belongs to the current generation.
    #[inline]
    #[must_use]
    pub const fn accepts(&self, token: Generation) -> bool {
        token.0 == self.current
    }
}
