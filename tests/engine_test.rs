//! Tests for the session engine and restart scheduler.

use sudoku_live::puzzle::{Difficulty, Grid, PuzzleError, PuzzleSource};
use sudoku_live::{
    Config, Engine, EngineError, EngineMessage, GameEvent, Status, ViewUpdate,
};
use tokio::sync::mpsc;

const PUZZLE: &str =
    "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
const SOLVED: &str =
    "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

/// Serves the same template and solution for every round.
struct FixedSource {
    template: Grid,
    solution: Grid,
}

impl FixedSource {
    fn new(template: &str, solution: &str) -> Self {
        Self {
            template: Grid::from_string(template).unwrap(),
            solution: Grid::from_string(solution).unwrap(),
        }
    }

    /// The solved grid with a single blank at (0,0); the missing digit is 5.
    fn one_blank() -> Self {
        let mut template = String::from(SOLVED);
        template.replace_range(0..1, "0");
        Self::new(&template, SOLVED)
    }
}

impl PuzzleSource for FixedSource {
    fn generate(&mut self, _difficulty: Difficulty) -> Result<Grid, PuzzleError> {
        Ok(self.template.clone())
    }

    fn solve(&mut self, _puzzle: &Grid) -> Option<Grid> {
        Some(self.solution.clone())
    }
}

/// Always fails generation.
struct FailingSource;

impl PuzzleSource for FailingSource {
    fn generate(&mut self, _difficulty: Difficulty) -> Result<Grid, PuzzleError> {
        Err(PuzzleError::Generation {
            message: "out of puzzles".to_string(),
        })
    }

    fn solve(&mut self, _puzzle: &Grid) -> Option<Grid> {
        None
    }
}

/// Generates fine but cannot solve its own puzzle.
struct UnsolvableSource;

impl PuzzleSource for UnsolvableSource {
    fn generate(&mut self, _difficulty: Difficulty) -> Result<Grid, PuzzleError> {
        Ok(Grid::from_string(PUZZLE).unwrap())
    }

    fn solve(&mut self, _puzzle: &Grid) -> Option<Grid> {
        None
    }
}

/// Returns a "solution" that still has blanks in it.
struct IncompleteSolutionSource;

impl PuzzleSource for IncompleteSolutionSource {
    fn generate(&mut self, _difficulty: Difficulty) -> Result<Grid, PuzzleError> {
        Ok(Grid::from_string(PUZZLE).unwrap())
    }

    fn solve(&mut self, puzzle: &Grid) -> Option<Grid> {
        Some(puzzle.clone())
    }
}

type Harness<S> = (
    Engine<S>,
    mpsc::UnboundedReceiver<EngineMessage>,
    mpsc::UnboundedReceiver<ViewUpdate>,
);

fn harness<S: PuzzleSource>(source: S) -> Harness<S> {
    let (msg_tx, msg_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = mpsc::unbounded_channel();
    let engine = Engine::new(source, Config::default(), msg_tx, view_tx);
    (engine, msg_rx, view_rx)
}

fn drain(view_rx: &mut mpsc::UnboundedReceiver<ViewUpdate>) -> Vec<ViewUpdate> {
    let mut updates = Vec::new();
    while let Ok(update) = view_rx.try_recv() {
        updates.push(update);
    }
    updates
}

#[tokio::test]
async fn start_round_emits_clear_and_full_board() {
    let (mut engine, _msg_rx, mut view_rx) = harness(FixedSource::new(PUZZLE, SOLVED));
    engine.start_round().unwrap();

    let updates = drain(&mut view_rx);
    assert_eq!(updates[0], ViewUpdate::Status(Status::Clear));

    let ViewUpdate::Board(board) = &updates[1] else {
        panic!("expected a board snapshot, got {:?}", updates[1]);
    };
    assert_eq!(board.rows.len(), 9);
    assert!(board.rows.iter().all(|row| row.len() == 9));
    assert!(board.rows[0][0].fixed, "clue cell renders read-only");
    assert!(!board.rows[0][2].fixed, "blank cell renders editable");
    assert_eq!(updates.len(), 2);

    assert_eq!(engine.round(), 1);
    assert_eq!(engine.session().unwrap().blank_count(), 51);
}

#[tokio::test]
async fn set_cell_mutates_board_and_emits_one_cell() {
    let (mut engine, _msg_rx, mut view_rx) = harness(FixedSource::new(PUZZLE, SOLVED));
    engine.start_round().unwrap();
    drain(&mut view_rx);

    engine
        .apply_event(GameEvent::SetCell { x: 2, y: 0, value: 4 })
        .unwrap();

    assert_eq!(engine.session().unwrap().board().get(2, 0), Some(4));
    let updates = drain(&mut view_rx);
    assert_eq!(updates.len(), 1);
    let ViewUpdate::Cell(cell) = &updates[0] else {
        panic!("expected a cell update, got {:?}", updates[0]);
    };
    assert_eq!((cell.x, cell.y, cell.value, cell.fixed), (2, 0, 4, false));
}

#[tokio::test]
async fn join_emits_snapshot_without_mutating() {
    let (mut engine, _msg_rx, mut view_rx) = harness(FixedSource::new(PUZZLE, SOLVED));
    engine.start_round().unwrap();
    let before = engine.session().unwrap().board().clone();
    drain(&mut view_rx);

    engine.apply_event(GameEvent::NewPlayer { id: 7 }).unwrap();

    let updates = drain(&mut view_rx);
    assert_eq!(updates.len(), 1);
    assert!(matches!(updates[0], ViewUpdate::Board(_)));
    assert_eq!(engine.session().unwrap().board(), &before);
}

#[tokio::test]
async fn noop_emits_nothing() {
    let (mut engine, _msg_rx, mut view_rx) = harness(FixedSource::new(PUZZLE, SOLVED));
    engine.start_round().unwrap();
    drain(&mut view_rx);

    engine.apply_event(GameEvent::Noop).unwrap();
    assert!(drain(&mut view_rx).is_empty());
}

#[tokio::test]
async fn out_of_grid_edit_is_dropped() {
    let (mut engine, _msg_rx, mut view_rx) = harness(FixedSource::new(PUZZLE, SOLVED));
    engine.start_round().unwrap();
    drain(&mut view_rx);

    // The parser admits coordinate 9; the engine must drop it, not panic.
    engine
        .apply_event(GameEvent::SetCell { x: 9, y: 0, value: 5 })
        .unwrap();
    assert!(drain(&mut view_rx).is_empty());
}

#[tokio::test]
async fn ongoing_tick_emits_progress_only() {
    let (mut engine, _msg_rx, mut view_rx) = harness(FixedSource::new(PUZZLE, SOLVED));
    engine.start_round().unwrap();
    drain(&mut view_rx);

    engine.tick(engine.round());

    let updates = drain(&mut view_rx);
    assert_eq!(updates.len(), 1);
    let ViewUpdate::Progress(progress) = &updates[0] else {
        panic!("expected a progress update, got {:?}", updates[0]);
    };
    assert_eq!(progress.percent_complete, 0);
    assert!(!engine.restart_scheduled());
}

#[tokio::test]
async fn completion_schedules_exactly_one_restart() {
    let (mut engine, _msg_rx, mut view_rx) = harness(FixedSource::one_blank());
    engine.start_round().unwrap();
    drain(&mut view_rx);

    engine
        .apply_event(GameEvent::SetCell { x: 0, y: 0, value: 5 })
        .unwrap();
    drain(&mut view_rx);

    engine.tick(engine.round());
    let updates = drain(&mut view_rx);
    assert_eq!(updates[0], ViewUpdate::Status(Status::Success));
    let ViewUpdate::Progress(progress) = &updates[1] else {
        panic!("expected a progress update, got {:?}", updates[1]);
    };
    assert_eq!(progress.percent_complete, 100);
    assert!(engine.restart_scheduled());

    // A queued tick from the same round arrives after the transition began;
    // it must not re-emit or re-schedule.
    engine.tick(engine.round());
    assert!(drain(&mut view_rx).is_empty());
    assert!(engine.restart_scheduled());
}

#[tokio::test]
async fn stale_tick_cannot_touch_the_new_round() {
    let (mut engine, _msg_rx, mut view_rx) = harness(FixedSource::new(PUZZLE, SOLVED));
    engine.start_round().unwrap();
    let old_round = engine.round();
    drain(&mut view_rx);

    engine.start_round().unwrap();
    let fresh = engine.session().unwrap().board().clone();
    drain(&mut view_rx);

    engine.tick(old_round);

    assert!(drain(&mut view_rx).is_empty(), "stale tick emitted output");
    assert!(!engine.restart_scheduled());
    assert_eq!(engine.round(), old_round + 1);
    assert_eq!(engine.session().unwrap().board(), &fresh);
}

#[tokio::test]
async fn start_game_event_begins_a_new_round() {
    let (mut engine, _msg_rx, mut view_rx) = harness(FixedSource::new(PUZZLE, SOLVED));
    engine.start_round().unwrap();
    drain(&mut view_rx);

    engine.apply_event(GameEvent::StartGame).unwrap();
    assert_eq!(engine.round(), 2);

    let updates = drain(&mut view_rx);
    assert_eq!(updates[0], ViewUpdate::Status(Status::Clear));
    assert!(matches!(updates[1], ViewUpdate::Board(_)));
}

#[tokio::test]
async fn generation_failure_is_fatal_to_the_attempt() {
    let (mut engine, _msg_rx, _view_rx) = harness(FailingSource);
    let err = engine.start_round().unwrap_err();
    assert!(matches!(
        err,
        EngineError::Puzzle(PuzzleError::Generation { .. })
    ));
}

#[tokio::test]
async fn unsolvable_round_is_fatal_to_the_attempt() {
    let (mut engine, _msg_rx, _view_rx) = harness(UnsolvableSource);
    let err = engine.start_round().unwrap_err();
    assert!(matches!(err, EngineError::Puzzle(PuzzleError::Solve)));
}

#[tokio::test]
async fn incomplete_solution_is_fatal_to_the_attempt() {
    let (mut engine, _msg_rx, _view_rx) = harness(IncompleteSolutionSource);
    let err = engine.start_round().unwrap_err();
    assert!(matches!(err, EngineError::Puzzle(PuzzleError::Solve)));
}

#[tokio::test]
async fn solving_every_blank_completes_the_round() {
    let (mut engine, _msg_rx, mut view_rx) = harness(FixedSource::new(PUZZLE, SOLVED));
    engine.start_round().unwrap();
    drain(&mut view_rx);

    let template = Grid::from_string(PUZZLE).unwrap();
    let solution = Grid::from_string(SOLVED).unwrap();
    for y in 0..9 {
        for x in 0..9 {
            if template.get(x, y) == Some(0) {
                let value = solution.get(x, y).unwrap();
                engine
                    .apply_event(GameEvent::SetCell { x, y, value })
                    .unwrap();
            }
        }
    }
    assert_eq!(engine.session().unwrap().board(), &solution);
    drain(&mut view_rx);

    engine.tick(engine.round());

    let updates = drain(&mut view_rx);
    let successes = updates
        .iter()
        .filter(|u| matches!(u, ViewUpdate::Status(Status::Success)))
        .count();
    assert_eq!(successes, 1);
    assert!(engine.restart_scheduled());
}
