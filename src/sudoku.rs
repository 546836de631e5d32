use std::{collections::HashSet, fmt, hash::Hash, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Largest supported region dimension; caps the grid at 25x25.
const MAX_REGION_DIM: usize = 5;

/// Matches the first character that cannot appear in a lowercased grid
/// representation.
static UNRECOGNISED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9a-wx ]").expect("Invalid representation character class"));

/// A single grid cell together with its domain of authorized values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    domain: u8,
    value: Option<u8>,
}

impl Cell {
    fn new(domain: u8) -> Self {
        Self {
            domain,
            value: None,
        }
    }

    /// Returns the cell value. Fails if the cell is unset.
    pub fn get(&self) -> Result<u8, GridError> {
        self.value.ok_or(GridError::Unset)
    }

    /// Returns the cell value without the set-state check.
    pub fn value(&self) -> Option<u8> {
        self.value
    }

    /// Sets the cell value. Fails if the value falls outside the cell domain.
    pub fn set(&mut self, value: u8) -> Result<(), GridError> {
        if value >= self.domain {
            return Err(GridError::Domain {
                value,
                domain: self.domain,
            });
        }

        self.value = Some(value);

        Ok(())
    }

    /// Queries whether the cell holds a value.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Clears the cell back to the unset state.
    pub fn reset(&mut self) {
        self.value = None;
    }

    fn to_char(self) -> char {
        match self.value {
            Some(value) if value < 10 => (b'0' + value) as char,
            Some(value) => (b'a' + value - 10) as char,
            None => ' ',
        }
    }
}

/// A square Sudoku grid of side `region_rows * region_cols`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sudoku {
    grid: Vec<Vec<Cell>>,
    size: usize,
    region_rows: usize,
    region_cols: usize,
}

impl Sudoku {
    /// Constructs a new grid by parsing the 1D string representation.
    ///
    /// The characters `'0'..'9'` and `'a'..'w'` (case-insensitive) denote the
    /// values 0..32, `'x'` and space denote an unset cell. The representation
    /// is read in row-major order and must hold exactly one character per
    /// cell; accepted values must fit the grid size.
    pub fn new(repr: &str, region_rows: usize, region_cols: usize) -> Result<Self, GridError> {
        if !(1..=MAX_REGION_DIM).contains(&region_rows)
            || !(1..=MAX_REGION_DIM).contains(&region_cols)
        {
            return Err(GridError::Config {
                region_rows,
                region_cols,
            });
        }

        let size = region_rows * region_cols;
        let num_cells = size * size;
        let repr = repr.to_ascii_lowercase();
        let actual = repr.chars().count();

        if actual != num_cells {
            return Err(GridError::Length {
                expected: num_cells,
                actual,
            });
        }

        if let Some(found) = UNRECOGNISED.find(&repr) {
            return Err(GridError::Character {
                character: found
                    .as_str()
                    .chars()
                    .next()
                    .expect("Regex matches exactly one character"),
                index: found.start(),
            });
        }

        let mut grid = vec![vec![Cell::new(size as u8); size]; size];

        for (index, ch) in repr.chars().enumerate() {
            let value = match ch {
                'x' | ' ' => continue,
                '0'..='9' => ch as u8 - b'0',
                'a'..='w' => ch as u8 - b'a' + 10,
                _ => unreachable!("Representation vetted by the character regex"),
            };

            if usize::from(value) >= size {
                return Err(GridError::Value { value, size, index });
            }

            grid[index / size][index % size].value = Some(value);
        }

        Ok(Self {
            grid,
            size,
            region_rows,
            region_cols,
        })
    }

    /// Returns a shared handle to the cell at the given position.
    pub fn cell(&self, row: usize, col: usize) -> Result<&Cell, GridError> {
        if row >= self.size || col >= self.size {
            return Err(GridError::Range {
                row,
                col,
                size: self.size,
            });
        }

        Ok(&self.grid[row][col])
    }

    /// Returns a mutable handle to the cell at the given position.
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut Cell, GridError> {
        if row >= self.size || col >= self.size {
            return Err(GridError::Range {
                row,
                col,
                size: self.size,
            });
        }

        Ok(&mut self.grid[row][col])
    }

    /// Reads the value of a set cell.
    pub fn get(&self, row: usize, col: usize) -> Result<u8, GridError> {
        self.cell(row, col)?.get()
    }

    /// Writes a value into a cell.
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> Result<(), GridError> {
        self.cell_mut(row, col)?.set(value)
    }

    /// Queries whether a cell holds a value.
    pub fn is_set(&self, row: usize, col: usize) -> Result<bool, GridError> {
        Ok(self.cell(row, col)?.is_set())
    }

    /// Clears a cell back to the unset state.
    pub fn reset(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        self.cell_mut(row, col)?.reset();
        Ok(())
    }

    /// Returns the grid side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the vertical size of a region, counted in rows.
    pub fn region_rows(&self) -> usize {
        self.region_rows
    }

    /// Returns the horizontal size of a region, counted in columns.
    pub fn region_cols(&self) -> usize {
        self.region_cols
    }

    /// Converts the inner grid into a 1D `String`, one character per cell in
    /// row-major order. Unset cells serialize as a single space; values of 10
    /// and above use the lowercase letters accepted back by [`Sudoku::new`].
    pub fn serialize(&self) -> String {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .map(|cell| cell.to_char())
            .collect()
    }

    /// Returns `true` once every cell of the grid holds a value.
    pub fn is_solved(&self) -> bool {
        self.grid.iter().flat_map(|row| row.iter()).all(Cell::is_set)
    }

    /// Checks for default Sudoku constraints, i.e. all values on the same row,
    /// column, and region are unique. If `pos` is `Some((row, col))`, the
    /// checks only cover the row, column, and region matching that position.
    pub fn is_valid(&self, pos: Option<(usize, usize)>) -> bool {
        match pos {
            Some((row, col)) => {
                // "Streamlined" version, only goes through the current coordinates' constraints
                self.check_row(row)
                    && self.check_col(col)
                    && self.check_region(row / self.region_rows, col / self.region_cols)
            }
            None => {
                // Default version, goes through the whole grid
                (0..self.size).all(|row| self.check_row(row))
                    && (0..self.size).all(|col| self.check_col(col))
                    && (0..self.size / self.region_rows).all(|band| {
                        (0..self.size / self.region_cols)
                            .all(|stack| self.check_region(band, stack))
                    })
            }
        }
    }

    fn check_row(&self, row: usize) -> bool {
        has_unique_items(self.grid[row].iter().filter_map(|cell| cell.value()))
    }

    fn check_col(&self, col: usize) -> bool {
        has_unique_items(self.grid.iter().filter_map(|row| row[col].value()))
    }

    fn check_region(&self, band: usize, stack: usize) -> bool {
        let region = self
            .grid
            .iter()
            .skip(band * self.region_rows)
            .take(self.region_rows)
            .flat_map(|row| {
                row.iter()
                    .skip(stack * self.region_cols)
                    .take(self.region_cols)
            })
            .filter_map(|cell| cell.value());

        has_unique_items(region)
    }
}

impl FromStr for Sudoku {
    type Err = GridError;

    /// Parses a standard 9x9 grid with 3x3 regions.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sudoku::new(s, 3, 3)
    }
}

impl fmt::Display for Sudoku {
    /// The default format is the flat string of [`Sudoku::serialize`]; the
    /// alternate format (`{:#}`) draws the board with region separators.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return f.write_str(&self.serialize());
        }

        let rule_width = 2 * self.size + 2 * (self.size / self.region_cols - 1);

        for (i, row) in self.grid.iter().enumerate() {
            if i > 0 && i % self.region_rows == 0 {
                writeln!(f, "{}", "-".repeat(rule_width))?;
            }

            for (j, cell) in row.iter().enumerate() {
                if j > 0 && j % self.region_cols == 0 {
                    write!(f, "| ")?;
                }

                write!(f, "{} ", cell.to_char())?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

pub fn has_unique_items<T>(iter: T) -> bool
where
    T: IntoIterator,
    T::Item: Eq + Hash,
{
    let mut uniq = HashSet::new();
    iter.into_iter().all(move |x| uniq.insert(x))
}
