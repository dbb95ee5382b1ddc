mod common;

use common::{Corridor, corridor_session};
use taxi_agents::{
    Error,
    bruteforce::{Corner, CornerSolver, ScriptedSequence, SequenceResolver},
    ports::Simulation,
    session::{EnvironmentSession, EpisodeOutcome, SessionConfig},
    taxi::{Direction, ScriptedAction, TaxiEnv, TaxiState, valid_start_states},
};

fn taxi_session(start: TaxiState) -> EnvironmentSession<TaxiEnv> {
    EnvironmentSession::new(TaxiEnv::new().with_start(start), SessionConfig::default())
}

fn solve_from(start: TaxiState) -> EpisodeOutcome {
    let mut session = taxi_session(start);
    CornerSolver::default()
        .solve(&mut session)
        .expect("scripted solver should not fail on Taxi")
}

#[test]
fn passenger_at_r_delivered_to_y_by_primary_tour() {
    // North/west probes are blocked immediately, one step east, back west,
    // then pickup, four moves south plus the blocked probe, dropoff.
    let outcome = solve_from(TaxiState::new(0, 0, 0, 2));
    assert!(outcome.solved);
    assert_eq!(outcome.steps, 13);
    assert_eq!(outcome.total_reward, 8.0);
    assert_eq!(outcome.penalties, 0);
}

#[test]
fn top_right_start_delivers_g_to_b() {
    let outcome = solve_from(TaxiState::new(0, 4, 1, 3));
    assert!(outcome.solved);
    assert_eq!(outcome.steps, 16);
    assert_eq!(outcome.total_reward, 5.0);
    assert_eq!(outcome.penalties, 0);
}

#[test]
fn failed_pickup_at_r_counts_one_penalty() {
    let outcome = solve_from(TaxiState::new(0, 0, 2, 0));
    assert!(outcome.solved);
    assert_eq!(outcome.steps, 19);
    assert_eq!(outcome.total_reward, -7.0);
    assert_eq!(outcome.penalties, 1);
}

#[test]
fn late_pickup_is_finished_by_backtrack_tour() {
    // Passenger waits at B, destination G: G is visited before the pickup.
    let outcome = solve_from(TaxiState::new(0, 4, 3, 1));
    assert!(outcome.solved);
    assert_eq!(outcome.steps, 73);
    assert_eq!(outcome.total_reward, -61.0);
    assert_eq!(outcome.penalties, 1);
}

#[test]
fn every_valid_start_is_solved() {
    let solver = CornerSolver::default();
    let mut total_steps = 0;
    let mut total_penalties = 0;
    for start in valid_start_states() {
        let mut session = taxi_session(start);
        let outcome = solver.solve(&mut session).unwrap();
        assert!(outcome.solved, "unsolved start {start:?}");
        assert!(outcome.steps >= 13 && outcome.steps <= 87, "{start:?}: {outcome:?}");
        total_steps += outcome.steps;
        total_penalties += outcome.penalties;
    }
    assert_eq!(total_steps, 16_495);
    assert_eq!(total_penalties, 510);
}

#[test]
fn corner_classification_is_exhaustive_on_taxi() {
    let solver = CornerSolver::default();
    let mut seen_left = 0;
    let mut seen_right = 0;
    for start in valid_start_states() {
        let mut session = taxi_session(start);
        let (initial, _) = session.reset().unwrap();
        let (corner, state) = solver.locate(&mut session, initial).unwrap();
        let position = TaxiState::decode(state).unwrap();
        match corner {
            Corner::TopLeft => {
                seen_left += 1;
                assert_eq!((position.row, position.col), (0, 0));
            }
            Corner::TopRight => {
                seen_right += 1;
                assert_eq!((position.row, position.col), (0, 4));
            }
        }
    }
    assert!(seen_left > 0 && seen_right > 0);
    assert_eq!(seen_left + seen_right, 300);
}

#[test]
fn move_until_blocked_is_idempotent() {
    for start in valid_start_states().into_iter().step_by(7) {
        for direction in [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ] {
            let mut session = taxi_session(start);
            let (initial, _) = session.reset().unwrap();
            let blocked = session.move_until_blocked(initial, direction).unwrap();
            let steps = session.metrics().steps;

            let again = session.move_until_blocked(blocked, direction).unwrap();
            assert_eq!(again, blocked);
            assert_eq!(session.metrics().steps, steps + 1);
        }
    }
}

#[test]
fn corridor_breaks_corner_classification() {
    let mut session = corridor_session(Corridor::new());
    let err = CornerSolver::default().solve(&mut session).unwrap_err();
    assert!(matches!(err, Error::CornerClassification { east_steps: 4 }));
}

#[test]
fn script_without_handle_location_is_rejected() {
    let err = ScriptedSequence::new(
        "broken",
        vec![ScriptedAction::South, ScriptedAction::East],
        vec![ScriptedAction::HandleLocation],
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingHandleLocation { ref script } if script == "broken/primary"));
}

#[test]
fn exhausted_scripts_are_an_unsolved_outcome() {
    // Only handle-location steps at a non-landmark cell: never delivers.
    let sequence = ScriptedSequence::new(
        "idle",
        vec![ScriptedAction::HandleLocation],
        vec![ScriptedAction::HandleLocation],
    )
    .unwrap();
    let mut session = taxi_session(TaxiState::new(2, 2, 0, 1));
    let (start, _) = session.reset().unwrap();
    let solved = SequenceResolver::new(&sequence)
        .solve(&mut session, start)
        .unwrap();
    assert!(!solved);
    let outcome = session.outcome(solved);
    assert_eq!(outcome.steps, 2);
    assert_eq!(outcome.penalties, 2);
    assert_eq!(outcome.total_reward, -20.0);
}

#[test]
fn playback_records_one_frame_per_step() {
    let mut session = taxi_session(TaxiState::new(0, 0, 0, 2)).with_playback();
    let outcome = CornerSolver::default().solve(&mut session).unwrap();
    assert_eq!(session.playback().len(), outcome.steps);
    assert!(session.playback().last().unwrap().contains("Dropoff"));
    assert_eq!(session.simulation().state_count(), 500);
}
