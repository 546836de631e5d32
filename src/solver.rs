use crate::sudoku::Sudoku;

/// Common interface of the Sudoku solvers.
pub trait SudokuSolver {
    /// Attempts to solve the grid in place.
    ///
    /// Returns `true` and fills every cell when a solution exists; returns
    /// `false` and leaves the grid untouched otherwise.
    fn solve(&mut self, sudoku: &mut Sudoku) -> bool;
}
