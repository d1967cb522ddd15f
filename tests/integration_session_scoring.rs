// Whole-session scoring through the public engine API, with explicit
// timestamps so every window boundary is exact.

use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use dualback::engine::{
    Advance, Channel, Position, ResponseOutcome, ScriptedStimuli, Session, SessionConfig, SessionPhase,
    StimulusStep,
};
use dualback::error::{ConfigError, SessionError};
use dualback::language::WordPool;

const STEP: Duration = Duration::from_millis(100);
const GAP: Duration = Duration::from_millis(25);

fn config(words: &[&str], lag: usize, total_steps: usize) -> SessionConfig {
    SessionConfig {
        lag,
        step_duration: STEP,
        inter_step_gap: GAP,
        total_steps,
        word_pool: WordPool::new(words.iter().copied()),
    }
}

fn scripted(pairs: &[(u8, &'static str)]) -> Session {
    Session::new(Box::new(ScriptedStimuli::from_pairs(pairs.iter().copied())))
}

/// Instant at which the window of step `i` closes, given the session started at `t0`.
fn close_of(t0: Instant, i: u32) -> Instant {
    t0 + (STEP + GAP) * (i + 1)
}

/// Polls through every remaining window, returning how many times the
/// session reported it finished.
fn run_out(session: &mut Session, t0: Instant, from: u32, to: u32) -> usize {
    (from..to)
        .filter(|&i| matches!(session.poll(close_of(t0, i)), Advance::Finished(_)))
        .count()
}

const ABCD: [(u8, &str); 4] = [(0, "A"), (1, "B"), (0, "C"), (1, "D")];

#[test]
fn position_press_at_lagged_match_is_a_hit() {
    let mut session = scripted(&ABCD);
    let t0 = Instant::now();
    session.start(config(&["A", "B", "C", "D"], 2, 4), t0).unwrap();

    session.poll(close_of(t0, 0));
    session.poll(close_of(t0, 1));
    assert_eq!(session.current_index(), Some(2));

    assert_eq!(session.record_response(Channel::Position), ResponseOutcome::Hit);
    assert_eq!(session.tally().pos_hit, 1);

    // Step 3 also matches on position (1 == 1) and is left unanswered.
    assert_eq!(run_out(&mut session, t0, 2, 4), 1);
    let tally = session.tally();
    assert_eq!((tally.pos_hit, tally.pos_miss), (1, 1));
    assert_eq!((tally.word_hit, tally.word_miss), (0, 0));
}

#[test]
fn unanswered_lagged_match_is_a_miss_once_the_window_closes() {
    let mut session = scripted(&ABCD);
    let t0 = Instant::now();
    session.start(config(&["A", "B", "C", "D"], 2, 3), t0).unwrap();

    session.poll(close_of(t0, 0));
    session.poll(close_of(t0, 1));
    assert_eq!(session.tally().pos_miss, 0);

    assert_matches!(session.poll(close_of(t0, 2)), Advance::Finished(t) if t.pos_miss == 1);
    assert_eq!(session.tally().word_miss, 0);
}

#[test]
fn single_word_pool_scores_every_eligible_step() {
    for total in [3usize, 4, 7] {
        let mut session = Session::seeded(5);
        let t0 = Instant::now();
        session.start(config(&["X"], 1, total), t0).unwrap();

        // Answer only the odd steps.
        for i in 0..total as u32 {
            if i % 2 == 1 {
                session.record_response(Channel::Word);
            }
            session.poll(close_of(t0, i));
        }

        let tally = session.tally();
        assert_eq!(session.phase(), SessionPhase::Result);
        assert_eq!((tally.word_hit + tally.word_miss) as usize, total - 1);
        assert_eq!(tally.word_hit as usize, (total - 1).div_ceil(2));
    }
}

#[test]
fn empty_pool_is_rejected_and_session_stays_idle() {
    let mut session = Session::seeded(1);
    let err = session
        .start(config(&[], 2, 5), Instant::now())
        .unwrap_err();

    assert_matches!(err, SessionError::Config(ConfigError::EmptyWordPool));
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.history().is_empty());
}

#[test]
fn result_is_entered_exactly_once() {
    let mut session = scripted(&ABCD);
    let t0 = Instant::now();
    session.start(config(&["A"], 1, 4), t0).unwrap();

    assert_eq!(run_out(&mut session, t0, 0, 4), 1);
    assert_eq!(session.phase(), SessionPhase::Result);

    // Late polls and presses change nothing.
    let frozen = session.tally();
    for i in 4..10 {
        assert_eq!(session.poll(close_of(t0, i)), Advance::Pending);
    }
    assert_eq!(session.record_response(Channel::Position), ResponseOutcome::Ignored);
    assert_eq!(session.tally(), frozen);
    assert_eq!(session.history().len(), 4);

    assert!(session.return_to_idle());
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[test]
fn restart_requires_going_through_idle() {
    let mut session = scripted(&ABCD);
    let t0 = Instant::now();
    session.start(config(&["A"], 1, 2), t0).unwrap();
    run_out(&mut session, t0, 0, 2);

    assert_matches!(
        session.start(config(&["A"], 1, 2), close_of(t0, 2)),
        Err(SessionError::NotIdle)
    );
    session.return_to_idle();
    assert!(session.start(config(&["A"], 1, 2), close_of(t0, 2)).is_ok());
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.tally().hits(Channel::Position), 0);
}

#[test]
fn tallies_never_exceed_eligible_steps() {
    for seed in 0..20u64 {
        let mut session = Session::seeded(seed);
        let t0 = Instant::now();
        let total = 12;
        let lag = 3;
        session.start(config(&["a", "b", "c"], lag, total), t0).unwrap();

        for i in 0..total as u32 {
            // Press both channels on every step, twice.
            for _ in 0..2 {
                session.record_response(Channel::Position);
                session.record_response(Channel::Word);
            }
            session.poll(close_of(t0, i));
        }

        let tally = session.tally();
        let eligible = (total - lag) as u32;
        assert!(tally.pos_hit + tally.pos_miss <= eligible, "seed {seed}");
        assert!(tally.word_hit + tally.word_miss <= eligible, "seed {seed}");
        // Everything that matched was pressed.
        assert_eq!(tally.pos_miss + tally.word_miss, 0, "seed {seed}");
    }
}

#[test]
fn warm_up_steps_are_never_scored() {
    let mut session = scripted(&[(4, "A"), (4, "A"), (4, "A"), (4, "A")]);
    let t0 = Instant::now();
    session.start(config(&["A"], 3, 4), t0).unwrap();

    for i in 0..3 {
        assert_eq!(session.record_response(Channel::Position), ResponseOutcome::Ignored);
        assert_eq!(session.record_response(Channel::Word), ResponseOutcome::Ignored);
        session.poll(close_of(t0, i));
        assert_eq!(session.tally(), Default::default());
    }

    assert_eq!(session.record_response(Channel::Word), ResponseOutcome::Hit);
    session.poll(close_of(t0, 3));
    let tally = session.tally();
    assert_eq!((tally.word_hit, tally.pos_miss), (1, 1));
}

#[test]
fn repeated_press_counts_once() {
    let mut session = scripted(&ABCD);
    let t0 = Instant::now();
    session.start(config(&["A"], 2, 4), t0).unwrap();
    session.poll(close_of(t0, 0));
    session.poll(close_of(t0, 1));

    assert_eq!(session.record_response(Channel::Position), ResponseOutcome::Hit);
    assert_eq!(session.record_response(Channel::Position), ResponseOutcome::Repeated);
    assert_eq!(session.tally().pos_hit, 1);
}

#[test]
fn stale_press_for_a_closed_step_is_dropped() {
    let mut session = scripted(&ABCD);
    let t0 = Instant::now();
    session.start(config(&["A"], 2, 4), t0).unwrap();
    session.poll(close_of(t0, 0));
    session.poll(close_of(t0, 1));
    session.poll(close_of(t0, 2));

    assert_eq!(
        session.record_response_for(2, Channel::Position),
        ResponseOutcome::Stale
    );
    assert_eq!(session.tally().pos_hit, 0);
    assert_eq!(session.tally().pos_miss, 1);
}

#[test]
fn identical_inputs_replay_to_identical_tallies() {
    let play = |seed: u64| {
        let mut session = Session::seeded(seed);
        let t0 = Instant::now();
        session.start(config(&["a", "b"], 2, 15), t0).unwrap();
        for i in 0..15u32 {
            if i % 3 == 0 {
                session.record_response(Channel::Position);
            }
            if i % 4 == 1 {
                session.record_response(Channel::Word);
            }
            session.poll(close_of(t0, i));
        }
        (session.history().to_vec(), session.tally())
    };

    assert_eq!(play(99), play(99));
}

#[test]
fn abort_discards_the_running_session() {
    let mut session = scripted(&ABCD);
    let t0 = Instant::now();
    session.start(config(&["A"], 1, 4), t0).unwrap();
    session.poll(close_of(t0, 0));

    session.abort();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.poll(close_of(t0, 5)), Advance::Pending);
    assert!(session.history().is_empty());
    assert!(session.window_remaining(close_of(t0, 1)).is_none());
}

#[test]
fn history_steps_are_what_the_source_produced() {
    let mut session = scripted(&ABCD);
    let t0 = Instant::now();
    session.start(config(&["A"], 1, 4), t0).unwrap();
    run_out(&mut session, t0, 0, 4);

    let expected: Vec<StimulusStep> = ABCD
        .iter()
        .map(|&(cell, word)| StimulusStep::new(Position::new(cell).unwrap(), word))
        .collect();
    assert_eq!(session.history(), expected.as_slice());
}
