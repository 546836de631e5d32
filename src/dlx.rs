use log::debug;

use crate::{
    matrix::{CoverMatrix, Direction, ROOT},
    solver::SudokuSolver,
    sudoku::Sudoku,
};

/// Sudoku solver built on Donald Knuth's Algorithm X. The grid is first
/// converted into an exact cover problem, after which the algorithm is
/// applied. Algorithm X in itself utilizes straightforward backtracking DFS,
/// but the use of a technique called dancing links (DLX) is what makes it
/// particularly efficient.
///
/// https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X
#[derive(Debug, Default)]
pub struct DlxSolver {
    visited_nodes: u64,
}

impl SudokuSolver for DlxSolver {
    /// Solves the Sudoku over a scoped cover matrix: the matrix is built from
    /// the grid, consumed by the search, and dropped before returning. The
    /// chosen candidates are committed to the grid only when the search
    /// succeeds, so a failed solve leaves the grid untouched.
    fn solve(&mut self, sudoku: &mut Sudoku) -> bool {
        self.visited_nodes = 0;

        let mut matrix = CoverMatrix::build(sudoku);
        let mut solution = Vec::with_capacity(sudoku.size() * sudoku.size());

        debug!(
            "Built a cover matrix with {} columns and {} nodes",
            matrix.num_columns(),
            matrix.num_nodes()
        );

        let solved = self.search(&mut matrix, &mut solution);

        if solved {
            // Rows forced by pre-set cells rewrite their own value
            for &idx in &solution {
                let (row, col, value) = matrix.candidate(idx);
                sudoku
                    .set(row, col, value)
                    .expect("Candidate assignments stay inside the grid domain");
            }
        }

        debug!(
            "Search finished with result {} after visiting {} nodes",
            solved, self.visited_nodes
        );

        solved
    }
}

impl DlxSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of candidate nodes explored by the most recent
    /// solve.
    pub fn visited_nodes(&self) -> u64 {
        self.visited_nodes
    }

    /// Recursive Algorithm X step over the reduced matrix.
    ///
    /// Chooses the least populated column, covers it, and explores its rows
    /// top to bottom: each row is pushed onto the partial solution and the
    /// columns it shares a candidate with are covered before descending. The
    /// undo pass walks in the opposite direction, which restores the matrix
    /// to the exact state it had before the descent.
    fn search(&mut self, matrix: &mut CoverMatrix, solution: &mut Vec<usize>) -> bool {
        let column = matrix.choose_column();

        if column == ROOT {
            // Every constraint is satisfied
            return true;
        }

        matrix.cover(column);

        let mut solved = false;
        let mut rows = matrix.walk_from(column);

        while let Some(ci) = rows.next(matrix, Direction::Down) {
            self.visited_nodes += 1;
            solution.push(ci);

            let mut row_items = matrix.walk_from(ci);

            while let Some(rj) = row_items.next(matrix, Direction::Next) {
                matrix.cover(matrix.header_of(rj));
            }

            solved = self.search(matrix, solution);

            let mut row_items = matrix.walk_from(ci);

            while let Some(rj) = row_items.next(matrix, Direction::Prev) {
                matrix.uncover(matrix.header_of(rj));
            }

            if solved {
                break;
            }

            solution.pop();
        }

        matrix.uncover(column);

        solved
    }
}
