//! Seeded puzzle generator.

use super::grid::{CELL_COUNT, GRID_SIZE, Grid};
use super::{Difficulty, PuzzleError, PuzzleSource, Solver};
use tracing::{debug, instrument};

/// Generates puzzles by filling a random complete grid and digging cells
/// back out while the solution stays unique.
#[derive(Debug)]
pub struct Generator {
    rng: fastrand::Rng,
    solver: Solver,
}

impl Generator {
    /// Creates a generator with a random seed.
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
            solver: Solver::new(),
        }
    }

    /// Creates a generator with a fixed seed for reproducible puzzles.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            solver: Solver::new(),
        }
    }

    /// Fills the grid completely, trying candidate digits in random order.
    fn fill(&mut self, grid: &mut Grid) -> bool {
        let Some((x, y)) = grid.first_blank() else {
            return true;
        };

        let mut values: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        self.rng.shuffle(&mut values);

        for value in values {
            if grid.allows(x, y, value) {
                grid.set_unchecked(x, y, value);
                if self.fill(grid) {
                    return true;
                }
                grid.set_unchecked(x, y, 0);
            }
        }

        false
    }

    /// Blanks cells in random order, keeping each removal only if the
    /// puzzle still has a unique solution.
    fn dig(&mut self, grid: &mut Grid, target_blanks: usize) {
        let mut order: Vec<usize> = (0..CELL_COUNT).collect();
        self.rng.shuffle(&mut order);

        let mut blanks = 0;
        for index in order {
            if blanks >= target_blanks {
                break;
            }

            let (x, y) = (index % GRID_SIZE, index / GRID_SIZE);
            let value = grid.get(x, y).unwrap_or(0);
            if value == 0 {
                continue;
            }

            grid.set_unchecked(x, y, 0);
            if self.solver.has_unique_solution(grid) {
                blanks += 1;
            } else {
                grid.set_unchecked(x, y, value);
            }
        }

        debug!(blanks, target_blanks, "dug puzzle");
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleSource for Generator {
    #[instrument(skip(self))]
    fn generate(&mut self, difficulty: Difficulty) -> Result<Grid, PuzzleError> {
        let mut grid = Grid::empty();
        if !self.fill(&mut grid) {
            return Err(PuzzleError::Generation {
                message: "could not fill a complete grid".to_string(),
            });
        }

        let target_blanks = CELL_COUNT - difficulty.clue_target();
        self.dig(&mut grid, target_blanks);

        debug!(%difficulty, clues = CELL_COUNT - grid.blank_count(), "generated puzzle");
        Ok(grid)
    }

    fn solve(&mut self, puzzle: &Grid) -> Option<Grid> {
        self.solver.solve(puzzle)
    }
}
