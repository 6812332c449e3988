//! End-to-end match scenarios: host and joiner sessions driven directly,
//! with messages shuttled over an in-memory wire.

mod common;

use common::{connected_pair, play_round, pump_both, run_countdown, start_first_round};
use emotion_arena::{ArenaEvent, MatchConfig, MatchOutcome, MatchPhase, RoundVerdict};

fn short_match(rounds_to_win: u32) -> MatchConfig {
    MatchConfig {
        rounds_to_win,
        ..MatchConfig::default()
    }
}

#[test]
fn host_threshold_win_cascades_to_game_over() {
    let (mut host, mut joiner, mut host_ch, mut joiner_ch) = connected_pair(short_match(1));
    start_first_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);
    play_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch, true);

    // The winning round immediately ends the match; there is no extra pause
    // between the round resolving and the game-over broadcast.
    assert_eq!(host.phase(), MatchPhase::MatchOver);
    assert_eq!(host.scores(), (1, 0));
    let host_events: Vec<_> = host.events().collect();
    assert!(host_events.iter().any(|e| matches!(
        e,
        ArenaEvent::RoundResolved {
            verdict: RoundVerdict::Local,
            ..
        }
    )));
    assert!(host_events.iter().any(|e| matches!(
        e,
        ArenaEvent::MatchOver {
            outcome: MatchOutcome::Victory,
            score_local: 1,
            score_opponent: 0,
        }
    )));

    assert_eq!(joiner.phase(), MatchPhase::MatchOver);
    assert_eq!(joiner.scores(), (0, 1));
    let joiner_events: Vec<_> = joiner.events().collect();
    assert!(joiner_events.iter().any(|e| matches!(
        e,
        ArenaEvent::MatchOver {
            outcome: MatchOutcome::Defeat,
            score_local: 0,
            score_opponent: 1,
        }
    )));
}

#[test]
fn joiner_win_is_decided_by_host() {
    let (mut host, mut joiner, mut host_ch, mut joiner_ch) =
        connected_pair(MatchConfig::default());
    start_first_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);

    // The joiner only reports values; the verdict comes back from the host.
    play_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch, false);

    assert_eq!(host.phase(), MatchPhase::RoundResolved);
    assert_eq!(host.scores(), (0, 1));
    assert_eq!(joiner.phase(), MatchPhase::RoundResolved);
    assert_eq!(joiner.scores(), (1, 0));

    let joiner_events: Vec<_> = joiner.events().collect();
    assert!(joiner_events.iter().any(|e| matches!(
        e,
        ArenaEvent::RoundResolved {
            verdict: RoundVerdict::Local,
            score_local: 1,
            score_opponent: 0,
        }
    )));
}

#[test]
fn scores_mirror_across_rounds() {
    let (mut host, mut joiner, mut host_ch, mut joiner_ch) = connected_pair(short_match(3));
    start_first_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);

    for round in 0..4u32 {
        let host_wins = round % 2 == 0;
        play_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch, host_wins);

        // The joiner's pair is always the host's pair with perspectives
        // swapped; it never drifts by local accounting.
        let (host_local, host_opponent) = host.scores();
        assert_eq!(joiner.scores(), (host_opponent, host_local));

        if host.phase() == MatchPhase::MatchOver {
            break;
        }
        host.advance_round(host.generation()).expect("host advances");
        pump_both(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);
        run_countdown(&mut host);
        run_countdown(&mut joiner);
        assert_eq!(host.phase(), MatchPhase::RoundActive);
        assert_eq!(joiner.phase(), MatchPhase::RoundActive);
        assert_eq!(host.round(), joiner.round());
        assert_eq!(host.target_emotion(), joiner.target_emotion());
    }
}

#[test]
fn match_terminates_exactly_at_rounds_to_win() {
    let (mut host, mut joiner, mut host_ch, mut joiner_ch) = connected_pair(short_match(2));
    start_first_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);

    play_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch, true);
    assert_eq!(host.phase(), MatchPhase::RoundResolved);

    host.advance_round(host.generation()).expect("host advances");
    pump_both(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);
    run_countdown(&mut host);
    run_countdown(&mut joiner);

    play_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch, true);
    assert_eq!(host.phase(), MatchPhase::MatchOver);
    assert_eq!(host.scores(), (2, 0));
    assert_eq!(joiner.phase(), MatchPhase::MatchOver);
    assert_eq!(joiner.scores(), (0, 2));
}

#[test]
fn timeout_draw_broadcasts_unchanged_scores() {
    let config = MatchConfig::default();
    let limit = config.round_time_limit;
    let (mut host, mut joiner, mut host_ch, mut joiner_ch) = connected_pair(config);
    start_first_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);
    let _ = host.events();
    let _ = joiner.events();

    // Neither player reports a sample. The joiner's clock running out does
    // nothing; only the host's expiry resolves the round.
    for _ in 0..limit {
        joiner.round_tick(joiner.generation());
    }
    assert_eq!(joiner.phase(), MatchPhase::RoundActive);

    let mut guard = 0u32;
    while host.phase() == MatchPhase::RoundActive {
        guard += 1;
        assert!(guard <= limit, "round clock failed to expire");
        host.round_tick(host.generation());
    }
    assert_eq!(host.phase(), MatchPhase::RoundResolved);
    assert_eq!(host.scores(), (0, 0));

    pump_both(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);
    assert_eq!(joiner.phase(), MatchPhase::RoundResolved);
    assert_eq!(joiner.scores(), (0, 0));

    for events in [
        host.events().collect::<Vec<_>>(),
        joiner.events().collect::<Vec<_>>(),
    ] {
        assert!(events.iter().any(|e| matches!(
            e,
            ArenaEvent::RoundResolved {
                verdict: RoundVerdict::Draw,
                score_local: 0,
                score_opponent: 0,
            }
        )));
    }
}

#[test]
fn rematch_restarts_with_zeroed_scores() {
    let (mut host, mut joiner, mut host_ch, mut joiner_ch) = connected_pair(short_match(1));
    start_first_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);
    play_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch, true);
    assert_eq!(host.phase(), MatchPhase::MatchOver);
    assert_eq!(joiner.phase(), MatchPhase::MatchOver);

    // The host alone restarts; the joiner mirrors the broadcast reset.
    host.play_again().expect("match is over");
    pump_both(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);

    assert_eq!(host.phase(), MatchPhase::Countdown);
    assert_eq!(joiner.phase(), MatchPhase::Countdown);
    assert_eq!(host.round(), 1);
    assert_eq!(joiner.round(), 1);
    assert_eq!(host.scores(), (0, 0));
    assert_eq!(joiner.scores(), (0, 0));
    assert_eq!(host.target_emotion(), joiner.target_emotion());
}

#[test]
fn joiner_rematch_request_sends_nothing() {
    let (mut host, mut joiner, mut host_ch, mut joiner_ch) = connected_pair(short_match(1));
    start_first_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);
    play_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch, true);
    assert_eq!(joiner.phase(), MatchPhase::MatchOver);

    // A joiner asking to play again is a local wait: nothing crosses the
    // wire, so the host stays put until it restarts on its own.
    joiner.play_again().expect("match is over");
    pump_both(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);
    assert_eq!(host.phase(), MatchPhase::MatchOver);
    assert_eq!(joiner.phase(), MatchPhase::MatchOver);

    host.play_again().expect("match is over");
    pump_both(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);
    assert_eq!(host.phase(), MatchPhase::Countdown);
    assert_eq!(joiner.phase(), MatchPhase::Countdown);
}

#[test]
fn opponent_progress_flows_both_ways() {
    let (mut host, mut joiner, mut host_ch, mut joiner_ch) =
        connected_pair(MatchConfig::default());
    start_first_round(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);
    let _ = host.events();
    let _ = joiner.events();

    host.perception_tick(host.generation(), 0.5);
    joiner.perception_tick(joiner.generation(), 0.4);
    pump_both(&mut host, &mut joiner, &mut host_ch, &mut joiner_ch);

    assert!(host
        .events()
        .any(|e| matches!(e, ArenaEvent::OpponentProgress { .. })));
    assert!(joiner
        .events()
        .any(|e| matches!(e, ArenaEvent::OpponentProgress { .. })));
}

#[test]
fn name_exchange_happens_on_channel_open() {
    let (mut host, mut joiner, _host_ch, _joiner_ch) = connected_pair(MatchConfig::default());
    assert_eq!(host.opponent_name(), Some("Joina"));
    assert_eq!(joiner.opponent_name(), Some("Hosta"));
}
