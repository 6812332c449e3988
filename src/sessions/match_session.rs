//! The match state machine.
//!
//! [`MatchSession`] is a transition machine, not an active object: it owns no
//! timers, threads, or sockets. The embedder feeds it inbound [`Message`]s
//! (via [`MatchSession::pump`] or [`MatchSession::handle_message`]), raw
//! perception samples, and the clock ticks it scheduled, then drains outbound
//! messages from [`MatchSession::take_outbound`] and user-facing events from
//! [`MatchSession::events`].
//!
//! # Authority
//!
//! Hosts (and solo sessions) decide everything: target emotions, round
//! winners, score updates, round advancement, and match termination. A joiner
//! performs no win evaluation at all; it mirrors host broadcasts, overwriting
//! its score pair with each authoritative snapshot. Every scoring decision
//! therefore flows through one code path on one peer, so the two clients can
//! never disagree about the outcome.
//!
//! # Scheduling contract
//!
//! After any call that changes the session's phase, the embedder re-reads
//! [`MatchSession::phase`] and [`MatchSession::generation`] and schedules the
//! ticks that phase needs: countdown ticks during `Countdown`, the one-second
//! round clock and the perception stream during `RoundActive`, and the
//! inter-round advance after `RoundResolved` (authoritative sessions only).
//! Each tick callback passes the token it was scheduled with; a tick whose
//! round has since been torn down fails the generation check and does
//! nothing.

use std::collections::VecDeque;

use smallvec::SmallVec;
use tracing::{debug, trace};
use web_time::Instant;

use crate::clock::{Generation, GenerationCounter};
use crate::emotion::{Emotion, EmotionSelector};
use crate::error::ArenaError;
use crate::network::messages::{Message, MessageBody, MessageHeader, ScorePair, WireWinner};
use crate::network::peer_session::{PeerSession, PeerSessionState};
use crate::rng::Pcg32;
use crate::room_code::RoomCode;
use crate::round::RoundState;
use crate::sessions::config::MatchConfig;
use crate::sessions::event_drain::EventDrain;
use crate::{ArenaEvent, Confidence, MatchOutcome, MatchPhase, ReliableChannel, Role, RoundVerdict};

/// A running host, joiner, or solo session. Build one with
/// [`SessionBuilder`](crate::SessionBuilder).
#[derive(Debug)]
pub struct MatchSession {
    role: Role,
    config: MatchConfig,
    phase: MatchPhase,
    round: u32,
    score_local: u32,
    score_opponent: u32,
    target_emotion: Option<Emotion>,
    round_state: Option<RoundState>,
    countdown_remaining: u32,
    selector: EmotionSelector,
    rng: Pcg32,
    generations: GenerationCounter,
    peer: Option<PeerSession>,
    room_code: Option<RoomCode>,
    magic: u16,
    remote_magic: Option<u16>,
    outbox: VecDeque<Message>,
    events: VecDeque<ArenaEvent>,
}

impl MatchSession {
    pub(crate) fn new(
        role: Role,
        config: MatchConfig,
        local_name: String,
        room_code: Option<RoomCode>,
        mut rng: Pcg32,
    ) -> Self {
        // Nonzero so a zeroed header can never masquerade as ours.
        let magic = rng.gen_range(1..u32::from(u16::MAX) + 1) as u16;
        let selector = EmotionSelector::with_seed(u64::from(rng.next_u32()) << 32 | u64::from(rng.next_u32()));
        let peer = match role {
            Role::Solo => None,
            Role::Host | Role::Joiner => {
                Some(PeerSession::new(local_name, config.connect_timeout))
            }
        };
        Self {
            role,
            config,
            phase: MatchPhase::Idle,
            round: 0,
            score_local: 0,
            score_opponent: 0,
            target_emotion: None,
            round_state: None,
            countdown_remaining: 0,
            selector,
            rng,
            generations: GenerationCounter::new(),
            peer,
            room_code,
            magic,
            remote_magic: None,
            outbox: VecDeque::new(),
            events: VecDeque::new(),
        }
    }

    // ###############
    // # ACCESSORS   #
    // ###############

    /// The session's fixed role.
    #[inline]
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// The current match phase.
    #[inline]
    #[must_use]
    pub const fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// The current round number. Zero before the first match starts.
    #[inline]
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Scores as `(local, opponent)`.
    #[inline]
    #[must_use]
    pub const fn scores(&self) -> (u32, u32) {
        (self.score_local, self.score_opponent)
    }

    /// The current target emotion, once a match has started.
    #[inline]
    #[must_use]
    pub const fn target_emotion(&self) -> Option<Emotion> {
        self.target_emotion
    }

    /// The room code this session hosts or joined, if any.
    #[must_use]
    pub const fn room_code(&self) -> Option<&RoomCode> {
        self.room_code.as_ref()
    }

    /// Seconds remaining in the active round.
    #[must_use]
    pub fn time_remaining(&self) -> Option<u32> {
        self.round_state.as_ref().map(RoundState::time_remaining)
    }

    /// The local player's smoothed value in the active round.
    #[must_use]
    pub fn local_value(&self) -> Option<Confidence> {
        self.round_state.as_ref().map(RoundState::local_value)
    }

    /// The opponent's last reported value in the active round.
    #[must_use]
    pub fn opponent_value(&self) -> Option<Confidence> {
        self.round_state.as_ref().map(RoundState::opponent_value)
    }

    /// The opponent's display name, once announced.
    #[must_use]
    pub fn opponent_name(&self) -> Option<&str> {
        self.peer.as_ref().and_then(PeerSession::opponent_name)
    }

    /// The peer connection state, for networked sessions.
    #[must_use]
    pub fn peer_state(&self) -> Option<PeerSessionState> {
        self.peer.as_ref().map(PeerSession::state)
    }

    /// The token identifying the current scheduling generation. Pass it back
    /// into the tick entry points; see the module docs for the contract.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generations.current()
    }

    /// The configuration this session runs with.
    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Drains all pending user-facing events.
    pub fn events(&mut self) -> EventDrain<'_> {
        EventDrain::from_drain(self.events.drain(..))
    }

    /// Takes every outbound message queued since the last call, in send
    /// order. [`MatchSession::pump`] calls this for you.
    pub fn take_outbound(&mut self) -> SmallVec<[Message; 4]> {
        self.outbox.drain(..).collect()
    }

    // ########################
    // # CONNECTION LIFECYCLE #
    // ########################

    /// Records the start of the joiner's dial at `now`, arming the connect
    /// deadline.
    pub fn begin_connect(&mut self, now: Instant) {
        if let Some(peer) = &mut self.peer {
            peer.begin_connect(now);
        }
    }

    /// Checks the connect deadline. Call when the scheduled timeout fires.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::ConnectTimeout`] if the channel did not open in
    /// time. The session is closed; the room may not exist or the host left.
    pub fn check_connect_timeout(&mut self, now: Instant) -> Result<(), ArenaError> {
        match &mut self.peer {
            Some(peer) => peer.check_connect_timeout(now),
            None => Ok(()),
        }
    }

    /// Records that the transport opened the reliable channel. Queues the
    /// local display name for the opponent.
    pub fn channel_open(&mut self) {
        let Some(peer) = &mut self.peer else {
            return;
        };
        peer.channel_open();
        if peer.state() != PeerSessionState::Connected {
            return;
        }
        debug!(role = ?self.role, "peer channel open");
        let name = peer.local_name().to_owned();
        self.events.push_back(ArenaEvent::OpponentConnected);
        self.queue(MessageBody::PlayerInfo { name });
    }

    /// Records that the transport lost the channel.
    ///
    /// If a match was active this terminates it with
    /// [`MatchOutcome::OpponentLeft`]; mid-handshake it only closes the peer.
    pub fn channel_closed(&mut self) {
        let Some(peer) = &mut self.peer else {
            return;
        };
        if peer.state() == PeerSessionState::Closed {
            return;
        }
        peer.close();
        debug!(role = ?self.role, phase = ?self.phase, "peer channel closed");
        self.events.push_back(ArenaEvent::OpponentDisconnected);
        if self.match_in_progress() {
            self.finish_match(MatchOutcome::OpponentLeft, false);
        }
    }

    /// Records degradation of the best-effort media stream. Never affects
    /// protocol state.
    pub fn media_degraded(&mut self) {
        if let Some(peer) = &mut self.peer {
            peer.set_media_degraded();
            self.events.push_back(ArenaEvent::MediaDegraded);
        }
    }

    /// Announces local readiness to the opponent.
    ///
    /// The readiness barrier is commutative; this may complete it, in which
    /// case [`ArenaEvent::BothReady`] is emitted.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::InvalidRequest`] for solo sessions or before dialing.
    /// - [`ArenaError::ChannelClosed`] if the peer channel is gone.
    pub fn local_ready(&mut self) -> Result<(), ArenaError> {
        let Some(peer) = &mut self.peer else {
            return Err(ArenaError::InvalidRequest {
                info: "solo sessions have no readiness barrier".to_owned(),
            });
        };
        match peer.state() {
            PeerSessionState::Connected => {
                let completed = peer.mark_local_ready();
                self.queue(MessageBody::Ready);
                if completed {
                    self.events.push_back(ArenaEvent::BothReady);
                }
                Ok(())
            }
            PeerSessionState::BothReady | PeerSessionState::Active => Ok(()),
            PeerSessionState::Closed => Err(ArenaError::ChannelClosed),
            PeerSessionState::Disconnected | PeerSessionState::Connecting => {
                Err(ArenaError::InvalidRequest {
                    info: "peer channel is not open yet".to_owned(),
                })
            }
        }
    }

    // ####################
    // # MATCH LIFECYCLE  #
    // ####################

    /// Starts the match. Authoritative sessions only.
    ///
    /// Hosts require a satisfied readiness barrier; solo sessions start
    /// immediately. Broadcasts `game_start` and enters the countdown.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::InvalidRequest`] if called on a joiner or while a
    ///   match is already running.
    /// - [`ArenaError::NotReady`] if the readiness barrier is unsatisfied.
    pub fn start_match(&mut self) -> Result<(), ArenaError> {
        if !self.role.is_authoritative() {
            return Err(ArenaError::InvalidRequest {
                info: "only the host starts the match".to_owned(),
            });
        }
        if !matches!(self.phase, MatchPhase::Idle | MatchPhase::MatchOver) {
            return Err(ArenaError::InvalidRequest {
                info: "a match is already in progress".to_owned(),
            });
        }
        if let Some(peer) = &mut self.peer {
            peer.activate()?;
        }
        self.begin_fresh_match();
        Ok(())
    }

    /// Restarts the match after it ends.
    ///
    /// `play_again` is host-authority like everything else: an authoritative
    /// session resets in place and restarts immediately, broadcasting
    /// `play_again` so the joiner mirrors the reset, followed by the fresh
    /// `game_start`. A joiner's call sends nothing; it simply keeps waiting
    /// for the host's `game_start`.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidRequest`] unless the match is over.
    pub fn play_again(&mut self) -> Result<(), ArenaError> {
        if self.phase != MatchPhase::MatchOver {
            return Err(ArenaError::InvalidRequest {
                info: "the match is not over".to_owned(),
            });
        }
        if !self.role.is_authoritative() {
            return Ok(());
        }
        self.queue(MessageBody::PlayAgain);
        self.begin_fresh_match();
        Ok(())
    }

    /// Leaves the session. Notifies the opponent best-effort and closes the
    /// peer; pending outbound messages should still be flushed.
    pub fn leave(&mut self) {
        debug!(role = ?self.role, phase = ?self.phase, "local player left");
        self.queue(MessageBody::Leave);
        if let Some(peer) = &mut self.peer {
            peer.close();
        }
        self.round_state = None;
        self.phase = if self.round > 0 {
            MatchPhase::MatchOver
        } else {
            MatchPhase::Idle
        };
        self.generations.advance();
    }

    // ###########
    // # TICKS   #
    // ###########

    /// Advances the pre-round countdown. Call once per scheduled countdown
    /// interval with the token current when the countdown began.
    ///
    /// A stale token or a phase other than `Countdown` makes this a no-op.
    pub fn countdown_tick(&mut self, token: Generation) {
        if !self.generations.accepts(token) || self.phase != MatchPhase::Countdown {
            trace!(?token, "ignoring stale countdown tick");
            return;
        }
        self.countdown_remaining = self.countdown_remaining.saturating_sub(1);
        if self.countdown_remaining > 0 {
            self.events.push_back(ArenaEvent::CountdownTick {
                remaining: self.countdown_remaining,
            });
        } else {
            self.start_round();
        }
    }

    /// Advances the one-second round clock.
    ///
    /// On expiry, an authoritative session resolves the round by comparing
    /// the two smoothed values (strictly greater wins, equality is a draw). A
    /// joiner's clock expiring does nothing; the host's `round_win` is the
    /// only way its round resolves.
    pub fn round_tick(&mut self, token: Generation) {
        if !self.generations.accepts(token) || self.phase != MatchPhase::RoundActive {
            trace!(?token, "ignoring stale round tick");
            return;
        }
        let Some(round) = &mut self.round_state else {
            return;
        };
        if round.tick() > 0 {
            return;
        }
        if self.role.is_authoritative() {
            let verdict = round.timeout_verdict();
            debug!(round = self.round, ?verdict, "round clock expired");
            self.resolve_round(verdict);
        }
    }

    /// Feeds one raw perception sample for the local player.
    ///
    /// Returns the new smoothed value, or `None` for a stale or out-of-phase
    /// tick. Queues an `emotion_update` for the opponent; on an authoritative
    /// session this is also a win-check point, and in solo mode it advances
    /// the synthetic opponent through the same win-check path.
    pub fn perception_tick(&mut self, token: Generation, raw: f32) -> Option<Confidence> {
        if !self.generations.accepts(token) || self.phase != MatchPhase::RoundActive {
            return None;
        }
        let emotion = self.target_emotion?;
        let round = self.round_state.as_mut()?;
        let value = round.report_local(raw)?;
        trace!(round = self.round, %value, "perception sample");
        self.queue(MessageBody::EmotionUpdate { emotion, value });

        if self.role == Role::Solo {
            self.advance_solo_opponent(emotion);
        }
        if self.role.is_authoritative() && self.phase == MatchPhase::RoundActive {
            self.check_threshold_win();
        }
        Some(value)
    }

    /// Advances from a resolved round to the next one. Authoritative
    /// sessions only; call when the scheduled inter-round delay fires.
    ///
    /// A stale token is a no-op (the match may have ended or been torn down
    /// since the delay was scheduled).
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidRequest`] if called on a joiner.
    pub fn advance_round(&mut self, token: Generation) -> Result<(), ArenaError> {
        if !self.role.is_authoritative() {
            return Err(ArenaError::InvalidRequest {
                info: "only the host advances rounds".to_owned(),
            });
        }
        if !self.generations.accepts(token) || self.phase != MatchPhase::RoundResolved {
            trace!(?token, "ignoring stale round advance");
            return Ok(());
        }
        self.round += 1;
        let emotion = self.selector.pick_next(self.target_emotion);
        self.target_emotion = Some(emotion);
        debug!(round = self.round, %emotion, "advancing round");
        self.queue(MessageBody::NextRound {
            round: self.round,
            emotion,
        });
        self.enter_countdown();
        Ok(())
    }

    // ##############
    // # MESSAGING  #
    // ##############

    /// Drives a [`ReliableChannel`]: drains its inbound messages into the
    /// session, flushes the session's outbox, and treats a closed channel as
    /// an opponent disconnect.
    pub fn pump(&mut self, channel: &mut dyn ReliableChannel) {
        for msg in channel.receive_all() {
            self.handle_message(msg);
        }
        for msg in self.take_outbound() {
            channel.send(&msg);
        }
        if !channel.is_open() {
            self.channel_closed();
        }
    }

    /// Applies one inbound message.
    ///
    /// Messages from a superseded peer incarnation (mismatched header magic)
    /// and messages that do not apply to the current phase are ignored; they
    /// are expected under teardown races, not errors.
    pub fn handle_message(&mut self, msg: Message) {
        let Message { header, body } = msg;
        match self.remote_magic {
            None => self.remote_magic = Some(header.magic),
            Some(magic) if magic == header.magic => {}
            Some(magic) => {
                trace!(
                    expected = magic,
                    got = header.magic,
                    "dropping message from stale peer incarnation"
                );
                return;
            }
        }
        match body {
            MessageBody::PlayerInfo { name } => self.on_player_info(name),
            MessageBody::Ready => self.on_ready(),
            MessageBody::GameStart {
                round,
                emotion,
                scores,
            } => self.on_game_start(round, emotion, scores),
            MessageBody::EmotionUpdate { emotion, value } => self.on_emotion_update(emotion, value),
            MessageBody::RoundWin { winner, scores } => self.on_round_win(winner, scores),
            MessageBody::NextRound { round, emotion } => self.on_next_round(round, emotion),
            MessageBody::GameOver { winner, scores } => self.on_game_over(winner, scores),
            MessageBody::PlayAgain => self.on_play_again(),
            MessageBody::Leave => self.on_leave(),
        }
    }

    // ####################
    // # MESSAGE HANDLERS #
    // ####################

    fn on_player_info(&mut self, name: String) {
        if let Some(peer) = &mut self.peer {
            peer.set_opponent_name(name.clone());
            self.events.push_back(ArenaEvent::OpponentInfo { name });
        }
    }

    fn on_ready(&mut self) {
        let Some(peer) = &mut self.peer else {
            return;
        };
        let completed = peer.mark_opponent_ready();
        self.events.push_back(ArenaEvent::OpponentReady);
        if completed {
            self.events.push_back(ArenaEvent::BothReady);
        }
    }

    fn on_game_start(&mut self, round: u32, emotion: Emotion, scores: ScorePair) {
        if self.role != Role::Joiner {
            trace!("ignoring game_start on authoritative session");
            return;
        }
        if !matches!(self.phase, MatchPhase::Idle | MatchPhase::MatchOver) {
            trace!(phase = ?self.phase, "ignoring out-of-phase game_start");
            return;
        }
        if let Some(peer) = &mut self.peer {
            if peer.state() == PeerSessionState::BothReady && peer.activate().is_err() {
                return;
            }
        }
        self.apply_wire_scores(scores);
        self.round = round;
        self.target_emotion = Some(emotion);
        debug!(round, %emotion, "match started by host");
        self.events.push_back(ArenaEvent::MatchStarted { round, emotion });
        self.enter_countdown();
    }

    fn on_emotion_update(&mut self, emotion: Emotion, value: Confidence) {
        if self.phase != MatchPhase::RoundActive {
            trace!(phase = ?self.phase, "ignoring out-of-phase emotion_update");
            return;
        }
        let Some(round) = &mut self.round_state else {
            return;
        };
        round.apply_remote(value);
        self.events
            .push_back(ArenaEvent::OpponentProgress { emotion, value });
        // The joiner displays the value and nothing more; only the host
        // evaluates wins.
        if self.role.is_authoritative() {
            self.check_threshold_win();
        }
    }

    fn on_round_win(&mut self, winner: WireWinner, scores: ScorePair) {
        if self.role != Role::Joiner {
            trace!("ignoring round_win on authoritative session");
            return;
        }
        if self.phase != MatchPhase::RoundActive {
            trace!(phase = ?self.phase, "ignoring out-of-phase round_win");
            return;
        }
        let verdict = self.verdict_from_wire(winner);
        let Some(round) = &mut self.round_state else {
            return;
        };
        if !round.resolve(verdict) {
            return;
        }
        self.apply_wire_scores(scores);
        self.phase = MatchPhase::RoundResolved;
        self.generations.advance();
        debug!(round = self.round, ?verdict, "round resolved by host");
        self.events.push_back(ArenaEvent::RoundResolved {
            verdict,
            score_local: self.score_local,
            score_opponent: self.score_opponent,
        });
    }

    fn on_next_round(&mut self, round: u32, emotion: Emotion) {
        if self.role != Role::Joiner {
            trace!("ignoring next_round on authoritative session");
            return;
        }
        if self.phase != MatchPhase::RoundResolved {
            trace!(phase = ?self.phase, "ignoring out-of-phase next_round");
            return;
        }
        self.round = round;
        self.target_emotion = Some(emotion);
        debug!(round, %emotion, "advancing round from host");
        self.enter_countdown();
    }

    fn on_game_over(&mut self, winner: WireWinner, scores: ScorePair) {
        if self.role != Role::Joiner {
            trace!("ignoring game_over on authoritative session");
            return;
        }
        if !self.match_in_progress() {
            trace!(phase = ?self.phase, "ignoring out-of-phase game_over");
            return;
        }
        self.apply_wire_scores(scores);
        let outcome = match winner {
            WireWinner::Joiner => MatchOutcome::Victory,
            WireWinner::Host | WireWinner::Draw => MatchOutcome::Defeat,
        };
        self.finish_match(outcome, false);
    }

    fn on_play_again(&mut self) {
        if self.role != Role::Joiner {
            trace!("ignoring play_again on authoritative session");
            return;
        }
        if self.phase != MatchPhase::MatchOver {
            trace!(phase = ?self.phase, "ignoring out-of-phase play_again");
            return;
        }
        // Mirror the host's in-place reset; the game_start that follows
        // carries the authoritative state for round one.
        self.score_local = 0;
        self.score_opponent = 0;
        self.round_state = None;
    }

    fn on_leave(&mut self) {
        debug!(role = ?self.role, "opponent left");
        self.channel_closed();
    }

    // ###############
    // # INTERNALS   #
    // ###############

    fn match_in_progress(&self) -> bool {
        matches!(
            self.phase,
            MatchPhase::Countdown | MatchPhase::RoundActive | MatchPhase::RoundResolved
        )
    }

    fn begin_fresh_match(&mut self) {
        self.score_local = 0;
        self.score_opponent = 0;
        self.round = 1;
        let emotion = self.selector.pick_next(None);
        self.target_emotion = Some(emotion);
        debug!(role = ?self.role, %emotion, "match starting");
        self.queue(MessageBody::GameStart {
            round: 1,
            emotion,
            scores: self.wire_scores(),
        });
        self.events
            .push_back(ArenaEvent::MatchStarted { round: 1, emotion });
        self.enter_countdown();
    }

    fn enter_countdown(&mut self) {
        self.phase = MatchPhase::Countdown;
        self.round_state = None;
        self.countdown_remaining = self.config.countdown_ticks;
        self.generations.advance();
        self.events.push_back(ArenaEvent::CountdownTick {
            remaining: self.countdown_remaining,
        });
    }

    fn start_round(&mut self) {
        self.phase = MatchPhase::RoundActive;
        self.round_state = Some(RoundState::new(
            self.config.round_time_limit,
            self.config.smoothing_factor,
        ));
        self.generations.advance();
        let Some(emotion) = self.target_emotion else {
            return;
        };
        debug!(round = self.round, %emotion, "round active");
        self.events.push_back(ArenaEvent::RoundStarted {
            round: self.round,
            emotion,
        });
    }

    /// Simulated opponent for solo play: a steady climb with jitter, fed
    /// through the same `apply_remote` + win-check path a real opponent uses.
    fn advance_solo_opponent(&mut self, emotion: Emotion) {
        let Some(round) = &mut self.round_state else {
            return;
        };
        let increment = 0.005 + self.rng.gen_f64() * 0.01;
        let noise = (self.rng.gen_f64() - 0.5) * 0.02;
        let next = round.opponent_value().as_f32() + (increment + noise) as f32;
        let value = Confidence::new(next);
        round.apply_remote(value);
        self.events
            .push_back(ArenaEvent::OpponentProgress { emotion, value });
    }

    /// Host-side win check against the configured threshold. Runs after
    /// every value change on either channel. If both channels are past the
    /// threshold, the channel that was updated first in this session's
    /// message order already resolved the round; resolution is idempotent.
    fn check_threshold_win(&mut self) {
        let Some(round) = &self.round_state else {
            return;
        };
        let verdict = if round.local_value().as_f32() >= self.config.win_threshold {
            RoundVerdict::Local
        } else if round.opponent_value().as_f32() >= self.config.win_threshold {
            RoundVerdict::Opponent
        } else {
            return;
        };
        self.resolve_round(verdict);
    }

    /// Resolves the active round: writes the verdict, updates scores,
    /// broadcasts `round_win`, and ends the match if a score reached the
    /// threshold. One atomic transition; no intermediate state is observable.
    fn resolve_round(&mut self, verdict: RoundVerdict) {
        let Some(round) = &mut self.round_state else {
            return;
        };
        if !round.resolve(verdict) {
            return;
        }
        match verdict {
            RoundVerdict::Local => self.score_local += 1,
            RoundVerdict::Opponent => self.score_opponent += 1,
            RoundVerdict::Draw => {}
        }
        self.phase = MatchPhase::RoundResolved;
        self.generations.advance();
        debug!(
            round = self.round,
            ?verdict,
            score_local = self.score_local,
            score_opponent = self.score_opponent,
            "round resolved"
        );
        self.queue(MessageBody::RoundWin {
            winner: self.wire_from_verdict(verdict),
            scores: self.wire_scores(),
        });
        self.events.push_back(ArenaEvent::RoundResolved {
            verdict,
            score_local: self.score_local,
            score_opponent: self.score_opponent,
        });

        if self.score_local >= self.config.rounds_to_win {
            self.finish_match(MatchOutcome::Victory, true);
        } else if self.score_opponent >= self.config.rounds_to_win {
            self.finish_match(MatchOutcome::Defeat, true);
        }
    }

    fn finish_match(&mut self, outcome: MatchOutcome, broadcast: bool) {
        self.phase = MatchPhase::MatchOver;
        self.round_state = None;
        self.generations.advance();
        debug!(
            ?outcome,
            score_local = self.score_local,
            score_opponent = self.score_opponent,
            "match over"
        );
        if broadcast {
            let winner = match outcome {
                MatchOutcome::Victory => self.wire_from_verdict(RoundVerdict::Local),
                MatchOutcome::Defeat => self.wire_from_verdict(RoundVerdict::Opponent),
                MatchOutcome::OpponentLeft => WireWinner::Draw,
            };
            self.queue(MessageBody::GameOver {
                winner,
                scores: self.wire_scores(),
            });
        }
        self.events.push_back(ArenaEvent::MatchOver {
            outcome,
            score_local: self.score_local,
            score_opponent: self.score_opponent,
        });
    }

    fn queue(&mut self, body: MessageBody) {
        if self.peer.is_none() {
            return;
        }
        self.outbox.push_back(Message {
            header: MessageHeader { magic: self.magic },
            body,
        });
    }

    /// Scores in wire (host) perspective. Only authoritative sessions send
    /// scores, so `local` is always the host side here.
    fn wire_scores(&self) -> ScorePair {
        ScorePair {
            host: self.score_local,
            joiner: self.score_opponent,
        }
    }

    /// Overwrites the local pair from an authoritative snapshot, mapping the
    /// wire's host perspective into this joiner's. Never increments.
    fn apply_wire_scores(&mut self, scores: ScorePair) {
        self.score_local = scores.joiner;
        self.score_opponent = scores.host;
    }

    fn verdict_from_wire(&self, winner: WireWinner) -> RoundVerdict {
        match winner {
            WireWinner::Joiner => RoundVerdict::Local,
            WireWinner::Host => RoundVerdict::Opponent,
            WireWinner::Draw => RoundVerdict::Draw,
        }
    }

    fn wire_from_verdict(&self, verdict: RoundVerdict) -> WireWinner {
        // Only authoritative sessions broadcast verdicts, so local is host.
        match verdict {
            RoundVerdict::Local => WireWinner::Host,
            RoundVerdict::Opponent => WireWinner::Joiner,
            RoundVerdict::Draw => WireWinner::Draw,
        }
    }
}
