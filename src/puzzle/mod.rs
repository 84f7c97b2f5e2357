//! Puzzle generation and solving behind the [`PuzzleSource`] seam.
//!
//! The session engine never generates or solves puzzles itself; it asks a
//! [`PuzzleSource`] for a template grid and its solution. The shipped
//! implementation is the seeded backtracking [`Generator`].

mod generator;
mod grid;
mod solver;

pub use generator::Generator;
pub use grid::{CELL_COUNT, GRID_SIZE, Grid};
pub use solver::Solver;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Puzzle difficulty, expressed as how many clues survive generation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Generous clue count; solvable with basic techniques.
    #[default]
    Easy,
    /// Fewer clues.
    Medium,
    /// Sparse clues.
    Hard,
    /// Minimal clues the digger can reach while staying unique.
    Expert,
}

impl Difficulty {
    /// Number of clues the generator aims to leave on the board.
    pub fn clue_target(self) -> usize {
        match self {
            Difficulty::Easy => 40,
            Difficulty::Medium => 34,
            Difficulty::Hard => 28,
            Difficulty::Expert => 24,
        }
    }
}

/// Failures reported by a puzzle source.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum PuzzleError {
    /// The source failed to produce a puzzle.
    #[display("failed to generate puzzle: {message}")]
    Generation {
        /// Reason reported by the source.
        message: String,
    },
    /// The solver could not fully solve the generated puzzle.
    #[display("failed to solve generated puzzle")]
    Solve,
}

/// Where puzzles come from.
///
/// The engine treats this as an opaque service: one call for a fresh
/// template, one call for its solution.
pub trait PuzzleSource {
    /// Produces a fresh puzzle template at the given difficulty.
    fn generate(&mut self, difficulty: Difficulty) -> Result<Grid, PuzzleError>;

    /// Attempts to fully solve the given puzzle; `None` means the source
    /// could not complete it.
    fn solve(&mut self, puzzle: &Grid) -> Option<Grid>;
}
