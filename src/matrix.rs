use crate::sudoku::Sudoku;

/// Arena index of the root node.
pub(crate) const ROOT: usize = 0;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Direction {
    Prev,
    Next,
    Up,
    Down,
}

impl Direction {
    fn opposite(&self) -> Self {
        match self {
            Direction::Prev => Direction::Next,
            Direction::Next => Direction::Prev,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Node of the cover matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node<T> {
    /// Links to available directions (i.e. previous, next, up, down in that particular order).
    links: [usize; 4],
    point: T,
}

impl<T> Node<T> {
    /// Initializes a new node with the given payload and no links to other nodes.
    fn new(point: T) -> Self {
        Self {
            links: [!0; 4],
            point,
        }
    }

    fn get_link(&self, dir: Direction) -> usize {
        self.links[dir as usize]
    }

    fn set_link(&mut self, idx: usize, dir: Direction) -> &mut Self {
        self.links[dir as usize] = idx;
        self
    }

    fn assign(&mut self, dir: Direction) -> &mut usize {
        &mut self.links[dir as usize]
    }
}

/// Payload stored inside a cover matrix node (`Node`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Point {
    /// Singleton root node ahead of all column headers.
    Root,
    /// Column header with its constraint id and a counter for items alive in
    /// the column.
    Column { id: usize, count: usize },
    /// Candidate assignment with its grid position, value, and a reference to
    /// the column header.
    Body {
        row: usize,
        col: usize,
        value: u8,
        header: usize,
    },
}

/// Wrapper for borrowless linked list traversal.
#[derive(Debug)]
pub(crate) struct Walker {
    idx: usize,
    start: usize,
}

impl Walker {
    #[inline]
    pub(crate) fn next(&mut self, matrix: &CoverMatrix, dir: Direction) -> Option<usize> {
        let next = matrix.nodes[self.idx].get_link(dir);
        self.idx = next;

        assert_ne!(next, !0, "Invalid index found in traversal");

        if next == self.start {
            return None;
        }

        Some(next)
    }
}

/// Toroidal doubly linked cover matrix of one solving run.
///
/// Each column is a constraint and each four-node row a candidate assignment.
/// All nodes live in a single arena and refer to each other through indices,
/// so covering only ever relinks; the whole structure is released in one step
/// when the matrix is dropped, pristine or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CoverMatrix {
    nodes: Vec<Node<Point>>,
    num_columns: usize,
}

impl CoverMatrix {
    /// Builds the cover matrix of the given grid: one column per constraint,
    /// followed by the candidate rows in row-major cell order with values
    /// ascending. A pre-set cell admits a single forced candidate instead of
    /// one per value.
    pub(crate) fn build(sudoku: &Sudoku) -> Self {
        let size = sudoku.size();
        let num_cells = size * size;
        let num_columns = 4 * num_cells;

        let mut matrix = Self {
            nodes: Vec::with_capacity(1 + num_columns + 4 * size * num_cells),
            num_columns,
        };

        matrix.init(num_columns);

        for row in 0..size {
            for col in 0..size {
                let cell = sudoku
                    .cell(row, col)
                    .expect("Grid position within the iterated bounds");

                let values = match cell.value() {
                    Some(value) => value..value + 1,
                    None => 0..size as u8,
                };

                for value in values {
                    matrix.append_row(sudoku, row, col, value);
                }
            }
        }

        matrix
    }

    /// Initializes the arena by inserting the root node and the column header
    /// row (and doing the necessary linking).
    fn init(&mut self, num_columns: usize) {
        let nodes = &mut self.nodes;
        nodes.push(Node::new(Point::Root));
        nodes.extend((0..num_columns).map(|id| Node::new(Point::Column { id, count: 0 })));

        // Link the whole header row in both dimensions
        for (idx, node) in nodes.iter_mut().enumerate() {
            // Selflink in Up-Down axis
            *node.assign(Direction::Next) = idx + 1;
            *node.assign(Direction::Prev) = idx.wrapping_sub(1);
            *node.assign(Direction::Up) = idx;
            *node.assign(Direction::Down) = idx;
        }

        // Fixup begin/end
        let len = nodes.len();
        *nodes[0].assign(Direction::Prev) = len - 1;
        *nodes[len - 1].assign(Direction::Next) = 0;
    }

    /// Appends the four-node candidate row of the assignment `(row, col, value)`,
    /// one node per constraint the assignment satisfies.
    fn append_row(&mut self, sudoku: &Sudoku, row: usize, col: usize, value: u8) {
        let size = sudoku.size();
        let num_cells = size * size;
        let v = usize::from(value);

        // Row-major region numbering
        let region = (row / sudoku.region_rows()) * (size / sudoku.region_cols())
            + col / sudoku.region_cols();

        #[allow(clippy::erasing_op, clippy::identity_op)]
        let columns = [
            0 * num_cells + row * size + col,    // cell (row, col) is filled
            1 * num_cells + row * size + v,      // row contains value
            2 * num_cells + col * size + v,      // column contains value
            3 * num_cells + region * size + v,   // region contains value
        ];

        let start = self.nodes.len();

        for id in columns {
            // Headers sit directly after the root, i.e. at constraint id + 1
            self.nodes.push(Node::new(Point::Body {
                row,
                col,
                value,
                header: id + 1,
            }));
        }

        // Append the new items to each of their columns
        for idx in start..start + 4 {
            self.append_to_col(idx);
        }

        // Link the Prev-Next axis into a circular row
        let end = self.nodes.len();

        for (idx, node) in self.nodes[start..].iter_mut().enumerate() {
            let prev_idx = if idx == 0 { end - 1 } else { start + idx - 1 };
            let next_idx = if start + idx + 1 == end {
                start
            } else {
                start + idx + 1
            };

            node.set_link(prev_idx, Direction::Prev);
            node.set_link(next_idx, Direction::Next);
        }
    }

    /// Appends the item `idx` to its column, directly above the header in the
    /// vertical ring.
    fn append_to_col(&mut self, idx: usize) {
        let header = self.header_of(idx);
        let old_end = self.nodes[header].get_link(Direction::Up);

        self.nodes[header].set_link(idx, Direction::Up);
        self.nodes[old_end].set_link(idx, Direction::Down);
        self.nodes[idx]
            .set_link(old_end, Direction::Up)
            .set_link(header, Direction::Down);

        *self.count_mut(header) += 1;
    }

    /// Removes (hides) a single node defined by `idx` in direction `dir` from
    /// the doubly linked list, leaving the node's own links untouched.
    fn remove(&mut self, idx: usize, dir: Direction) {
        let right = dir;
        let left = right.opposite();

        let x = &self.nodes[idx];
        let xr = x.get_link(right);
        let xl = x.get_link(left);

        self.nodes[xr].set_link(xl, left);
        self.nodes[xl].set_link(xr, right);
    }

    /// Restores a previously removed (hid) node defined by `idx` into the
    /// doubly linked list.
    fn restore(&mut self, idx: usize, dir: Direction) {
        let right = dir;
        let left = dir.opposite();

        let x = &self.nodes[idx];
        let xr = x.get_link(right);
        let xl = x.get_link(left);

        self.nodes[xr].set_link(idx, left);
        self.nodes[xl].set_link(idx, right);
    }

    /// Covers a column: the header leaves the header ring, and every row
    /// intersecting the column is spliced out of the other columns it
    /// touches. Horizontal links stay in place, which is what permits the
    /// exact restoration by [`CoverMatrix::uncover`].
    pub(crate) fn cover(&mut self, header: usize) {
        self.remove(header, Direction::Next);
        let mut rows = self.walk_from(header);

        while let Some(ci) = rows.next(self, Direction::Down) {
            let mut row_items = self.walk_from(ci);

            while let Some(rj) = row_items.next(self, Direction::Next) {
                self.remove(rj, Direction::Down);
                *self.col_count_mut(rj) -= 1;
            }
        }
    }

    /// Uncovers a column by replaying [`CoverMatrix::cover`] in the exact
    /// reverse traversal order, then reinserting the header into its ring.
    pub(crate) fn uncover(&mut self, header: usize) {
        let mut rows = self.walk_from(header);

        while let Some(ci) = rows.next(self, Direction::Up) {
            let mut row_items = self.walk_from(ci);

            while let Some(rj) = row_items.next(self, Direction::Prev) {
                self.restore(rj, Direction::Down);
                *self.col_count_mut(rj) += 1;
            }
        }

        self.restore(header, Direction::Next);
    }

    /// Picks the next column to cover: a linear scan of the header ring for
    /// the smallest live count, ties broken by the first header encountered.
    /// Returns [`ROOT`] when the ring is empty, i.e. when every constraint is
    /// satisfied.
    pub(crate) fn choose_column(&self) -> usize {
        let mut chosen = ROOT;
        let mut min = usize::MAX;
        let mut headers = self.walk_from(ROOT);

        while let Some(idx) = headers.next(self, Direction::Next) {
            let count = self.count_of(idx);

            if count < min {
                min = count;
                chosen = idx;

                if min == 0 {
                    // No column can beat an empty one
                    break;
                }
            }
        }

        chosen
    }

    #[inline]
    pub(crate) fn walk_from(&self, idx: usize) -> Walker {
        Walker { idx, start: idx }
    }

    /// Returns the column header index of a body node.
    pub(crate) fn header_of(&self, idx: usize) -> usize {
        match self.nodes[idx].point {
            Point::Body { header, .. } => header,
            point => panic!("Expected a body node, got {point:?}"),
        }
    }

    /// Returns the candidate assignment carried by a body node.
    pub(crate) fn candidate(&self, idx: usize) -> (usize, usize, u8) {
        match self.nodes[idx].point {
            Point::Body {
                row, col, value, ..
            } => (row, col, value),
            point => panic!("Expected a body node, got {point:?}"),
        }
    }

    fn count_of(&self, header: usize) -> usize {
        match self.nodes[header].point {
            Point::Column { count, .. } => count,
            point => panic!("Expected a column header, got {point:?}"),
        }
    }

    fn count_mut(&mut self, header: usize) -> &mut usize {
        match &mut self.nodes[header].point {
            Point::Column { count, .. } => count,
            point => panic!("Expected a column header, got {point:?}"),
        }
    }

    /// Returns a mutable count of the row item's column header.
    #[inline]
    fn col_count_mut(&mut self, idx: usize) -> &mut usize {
        let header = self.header_of(idx);
        self.count_mut(header)
    }

    pub(crate) fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub(crate) fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUZZLE: &str =
        "xx5x8xxxx78x3xxxxxx04x2xxxx84xx1xxxxx6xxxxxxx1x0x7xxxxxx3x6xxxxxxx5xxxxxxx120xxxx";

    fn nine_by_nine(repr: &str) -> CoverMatrix {
        CoverMatrix::build(&Sudoku::new(repr, 3, 3).unwrap())
    }

    #[test]
    fn empty_grid_build_shape() {
        let matrix = nine_by_nine(&"x".repeat(81));

        assert_eq!(matrix.num_columns(), 324);
        // Root, 324 headers, and four nodes per each of the 729 candidates
        assert_eq!(matrix.num_nodes(), 1 + 324 + 4 * 729);

        for header in 1..=matrix.num_columns() {
            assert_eq!(matrix.count_of(header), 9);
        }
    }

    #[test]
    fn preset_cell_contributes_one_candidate() {
        let matrix = nine_by_nine(&format!("5{}", "x".repeat(80)));

        // One forced candidate and 80 open cells with nine values each
        assert_eq!(matrix.num_nodes(), 1 + 324 + 4 * (1 + 80 * 9));

        // Column id 0 is the "cell (0, 0) is filled" constraint; headers sit
        // at constraint id + 1
        assert_eq!(matrix.count_of(1), 1);
        // The "cell (0, 1) is filled" constraint stays at full domain width
        assert_eq!(matrix.count_of(2), 9);
    }

    #[test]
    fn links_are_balanced() {
        let matrix = nine_by_nine(PUZZLE);

        for idx in 0..matrix.num_nodes() {
            for dir in [
                Direction::Prev,
                Direction::Next,
                Direction::Up,
                Direction::Down,
            ] {
                let neighbour = matrix.nodes[idx].get_link(dir);
                assert_eq!(matrix.nodes[neighbour].get_link(dir.opposite()), idx);
            }
        }
    }

    #[test]
    fn counts_match_column_lengths() {
        let matrix = nine_by_nine(PUZZLE);

        for header in 1..=matrix.num_columns() {
            let mut length = 0;
            let mut items = matrix.walk_from(header);

            while items.next(&matrix, Direction::Down).is_some() {
                length += 1;
            }

            assert_eq!(matrix.count_of(header), length);
        }
    }

    #[test]
    fn cover_uncover_is_an_exact_inverse() {
        let mut matrix = nine_by_nine(PUZZLE);
        let pristine = matrix.clone();

        for header in 1..=matrix.num_columns() {
            matrix.cover(header);
            assert_ne!(matrix, pristine);

            matrix.uncover(header);
            assert_eq!(matrix, pristine);
        }
    }

    #[test]
    fn nested_cover_uncover_round_trips() {
        let mut matrix = nine_by_nine(PUZZLE);
        let pristine = matrix.clone();

        matrix.cover(1);
        matrix.cover(2);
        matrix.uncover(2);
        matrix.uncover(1);

        assert_eq!(matrix, pristine);
    }

    #[test]
    fn chooses_the_least_populated_column() {
        // All counts tie on an empty grid, so the first header wins
        let matrix = nine_by_nine(&"x".repeat(81));
        assert_eq!(matrix.choose_column(), 1);

        // A pre-set cell leaves its cell constraint with a single candidate
        let mut repr = vec!['x'; 81];
        repr[4 * 9 + 4] = '5';
        let matrix = nine_by_nine(&repr.into_iter().collect::<String>());

        let chosen = matrix.choose_column();
        assert_eq!(chosen, 4 * 9 + 4 + 1);
        assert_eq!(matrix.count_of(chosen), 1);
    }
}
