//! The mutable state of one live round.

use crate::puzzle::{GRID_SIZE, Grid};
use chrono::{DateTime, Duration, Utc};
use derive_more::{Display, Error};
use tracing::instrument;

/// Generator-contract violations detected while assembling a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// A pre-filled template cell disagrees with the solution.
    #[display("fixed cell ({x},{y}) disagrees with the solution")]
    FixedCellMismatch {
        /// Column of the offending cell.
        x: usize,
        /// Row of the offending cell.
        y: usize,
    },
    /// The template leaves nothing for players to fill.
    #[display("template has no blank cells")]
    NoBlankCells,
    /// The round would end before it starts.
    #[display("round duration must be positive")]
    NonPositiveDuration,
}

/// One live round: the mutable board, the immutable template and solution,
/// and the absolute time bounds.
///
/// A session is created whole by the engine and discarded whole on restart;
/// it is never partially reset.
#[derive(Debug, Clone)]
pub struct Session {
    board: Grid,
    template: Grid,
    solution: Grid,
    blank_count: usize,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl Session {
    /// Builds a session from a generated template and its solution.
    ///
    /// The progress formula assumes every fixed cell already matches the
    /// solution, so that contract is checked here once rather than on every
    /// evaluation.
    #[instrument(skip(template, solution), fields(start = %start_time))]
    pub fn new(
        template: Grid,
        solution: Grid,
        start_time: DateTime<Utc>,
        duration: Duration,
    ) -> Result<Self, SessionError> {
        if duration <= Duration::zero() {
            return Err(SessionError::NonPositiveDuration);
        }

        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let fixed = template.get(x, y).unwrap_or(0);
                if fixed != 0 && solution.get(x, y) != Some(fixed) {
                    return Err(SessionError::FixedCellMismatch { x, y });
                }
            }
        }

        let blank_count = template.blank_count();
        if blank_count == 0 {
            return Err(SessionError::NoBlankCells);
        }

        Ok(Self {
            board: template.clone(),
            template,
            solution,
            blank_count,
            start_time,
            end_time: start_time + duration,
        })
    }

    /// Returns the board as edited so far.
    pub fn board(&self) -> &Grid {
        &self.board
    }

    /// Returns the puzzle as generated.
    pub fn template(&self) -> &Grid {
        &self.template
    }

    /// Returns the unique solution.
    pub fn solution(&self) -> &Grid {
        &self.solution
    }

    /// Number of template blanks, fixed at creation.
    pub fn blank_count(&self) -> usize {
        self.blank_count
    }

    /// Instant the round started.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Instant the round times out.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// True when the template pre-fills this cell.
    pub fn is_fixed(&self, x: usize, y: usize) -> bool {
        matches!(self.template.get(x, y), Some(v) if v != 0)
    }

    /// Writes a player edit to the board.
    ///
    /// Range validation happened upstream in the parser; coordinates that
    /// still fall outside the grid are reported back rather than applied.
    pub fn set_cell(&mut self, x: usize, y: usize, value: u8) -> Result<(), &'static str> {
        self.board.set(x, y, value)
    }
}
