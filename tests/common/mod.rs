//! Shared harness: an in-memory duplex wire and the handshake choreography
//! used by the scenario tests. No sockets; messages are shuttled by hand.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use emotion_arena::{
    MatchConfig, MatchPhase, MatchSession, Message, ReliableChannel, SessionBuilder,
};

struct Wire {
    to_host: VecDeque<Message>,
    to_joiner: VecDeque<Message>,
    open: bool,
}

/// One end of an in-memory reliable, ordered duplex channel.
pub struct Endpoint {
    wire: Rc<RefCell<Wire>>,
    is_host: bool,
}

impl Endpoint {
    /// Simulates the transport losing the connection, for both ends.
    pub fn sever(&self) {
        self.wire.borrow_mut().open = false;
    }
}

impl ReliableChannel for Endpoint {
    fn send(&mut self, msg: &Message) {
        let mut wire = self.wire.borrow_mut();
        if !wire.open {
            return;
        }
        if self.is_host {
            wire.to_joiner.push_back(msg.clone());
        } else {
            wire.to_host.push_back(msg.clone());
        }
    }

    fn receive_all(&mut self) -> Vec<Message> {
        let mut wire = self.wire.borrow_mut();
        let queue = if self.is_host {
            &mut wire.to_host
        } else {
            &mut wire.to_joiner
        };
        queue.drain(..).collect()
    }

    fn is_open(&self) -> bool {
        self.wire.borrow().open
    }
}

/// Routes session traces into the captured output of whichever test runs
/// first; later installs are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Creates a connected wire; the first endpoint is the host's.
pub fn wire_pair() -> (Endpoint, Endpoint) {
    let wire = Rc::new(RefCell::new(Wire {
        to_host: VecDeque::new(),
        to_joiner: VecDeque::new(),
        open: true,
    }));
    (
        Endpoint {
            wire: Rc::clone(&wire),
            is_host: true,
        },
        Endpoint {
            wire,
            is_host: false,
        },
    )
}

/// Pumps both sessions enough times for a message and its response to cross.
pub fn pump_both(
    host: &mut MatchSession,
    joiner: &mut MatchSession,
    host_ch: &mut Endpoint,
    joiner_ch: &mut Endpoint,
) {
    for _ in 0..2 {
        host.pump(host_ch);
        joiner.pump(joiner_ch);
    }
}

/// Runs a session's local countdown to completion.
pub fn run_countdown(session: &mut MatchSession) {
    let mut guard = 0;
    while session.phase() == MatchPhase::Countdown {
        guard += 1;
        assert!(guard < 100, "countdown failed to finish");
        session.countdown_tick(session.generation());
    }
}

/// Builds a host/joiner pair, opens the channel, and completes the readiness
/// handshake. Both sessions end up with the barrier satisfied.
pub fn connected_pair(config: MatchConfig) -> (MatchSession, MatchSession, Endpoint, Endpoint) {
    init_tracing();
    let mut host = SessionBuilder::new()
        .with_local_name("Hosta")
        .with_config(config.clone())
        .with_seed(11)
        .start_host_session()
        .expect("valid config");
    let code = host.room_code().expect("hosts have a code").clone();
    let mut joiner = SessionBuilder::new()
        .with_local_name("Joina")
        .with_config(config)
        .with_seed(22)
        .start_joiner_session(code.as_str())
        .expect("code parses");

    let (mut host_ch, mut joiner_ch) = wire_pair();
    host.channel_open();
    joiner.channel_open();
    pump_both(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);

    host.local_ready().expect("channel is open");
    joiner.local_ready().expect("channel is open");
    pump_both(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);

    (host, joiner, host_ch, joiner_ch)
}

/// Starts the match on the host and brings both sessions into the first
/// active round.
pub fn start_first_round(
    host: &mut MatchSession,
    joiner: &mut MatchSession,
    host_ch: &mut Endpoint,
    joiner_ch: &mut Endpoint,
) {
    host.start_match().expect("barrier satisfied");
    pump_both(host, joiner, host_ch, joiner_ch);
    run_countdown(host);
    run_countdown(joiner);
    assert_eq!(host.phase(), MatchPhase::RoundActive);
    assert_eq!(joiner.phase(), MatchPhase::RoundActive);
}

/// Feeds perfect samples to `winner` until the host resolves the round, then
/// delivers the verdict to both sides.
pub fn play_round(
    host: &mut MatchSession,
    joiner: &mut MatchSession,
    host_ch: &mut Endpoint,
    joiner_ch: &mut Endpoint,
    host_wins: bool,
) {
    let mut guard = 0;
    while host.phase() == MatchPhase::RoundActive {
        guard += 1;
        assert!(guard < 1_000, "round failed to resolve");
        if host_wins {
            host.perception_tick(host.generation(), 1.0);
        } else {
            joiner.perception_tick(joiner.generation(), 1.0);
        }
        pump_both(host, joiner, host_ch, joiner_ch);
    }
    pump_both(host, joiner, host_ch, joiner_ch);
}
