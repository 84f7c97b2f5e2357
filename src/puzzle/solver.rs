//! Backtracking solver used for solving and for uniqueness checks.

use super::grid::Grid;

/// Unit struct solver; stateless, all state is per-call.
#[derive(Debug, Default, Clone, Copy)]
pub struct Solver;

impl Solver {
    /// Creates a new solver.
    pub fn new() -> Self {
        Self
    }

    /// Solves the puzzle, returning the solved grid if one exists.
    pub fn solve(&self, grid: &Grid) -> Option<Grid> {
        let mut working = grid.clone();
        if solve_recursive(&mut working) {
            Some(working)
        } else {
            None
        }
    }

    /// Counts solutions, stopping once `limit` is reached.
    pub fn count_solutions(&self, grid: &Grid, limit: usize) -> usize {
        let mut working = grid.clone();
        let mut count = 0;
        count_recursive(&mut working, &mut count, limit);
        count
    }

    /// Checks that the puzzle has exactly one solution.
    pub fn has_unique_solution(&self, grid: &Grid) -> bool {
        self.count_solutions(grid, 2) == 1
    }
}

fn solve_recursive(grid: &mut Grid) -> bool {
    let Some((x, y)) = grid.first_blank() else {
        return true;
    };

    for value in 1..=9 {
        if grid.allows(x, y, value) {
            grid.set_unchecked(x, y, value);
            if solve_recursive(grid) {
                return true;
            }
            grid.set_unchecked(x, y, 0);
        }
    }

    false
}

fn count_recursive(grid: &mut Grid, count: &mut usize, limit: usize) {
    if *count >= limit {
        return;
    }

    let Some((x, y)) = grid.first_blank() else {
        *count += 1;
        return;
    };

    for value in 1..=9 {
        if grid.allows(x, y, value) {
            grid.set_unchecked(x, y, value);
            count_recursive(grid, count, limit);
            grid.set_unchecked(x, y, 0);
            if *count >= limit {
                return;
            }
        }
    }
}
