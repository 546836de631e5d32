//! Sudoku solving engine based on Knuth's dancing links (DLX) algorithm.
//!
//! A puzzle is parsed into a [`Sudoku`] grid, reduced to an exact cover
//! problem over a toroidal doubly linked matrix, and solved by a backtracking
//! search with constant-time cover and uncover operations.
//!
//! ```
//! use sudoku_dlx::Sudoku;
//!
//! let mut sudoku: Sudoku = "x".repeat(81).parse().unwrap();
//!
//! assert!(sudoku_dlx::solve(&mut sudoku));
//! assert!(sudoku.is_solved());
//! ```

pub mod dlx;
pub mod error;
pub mod solver;
pub mod sudoku;

mod matrix;

pub use crate::{
    dlx::DlxSolver,
    error::GridError,
    solver::SudokuSolver,
    sudoku::{Cell, Sudoku},
};

/// Solves the grid in place with the dancing links solver. Returns `true` if
/// a solution was found.
pub fn solve(sudoku: &mut Sudoku) -> bool {
    DlxSolver::new().solve(sudoku)
}
