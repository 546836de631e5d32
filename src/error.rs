use derive_more::{Display, Error};

/// Errors reported by grid construction and cell access.
///
/// The solver itself never surfaces errors: it signals failure only by
/// returning `false` and leaving the grid untouched.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Region dimensions outside the supported range.
    #[display("unsupported region dimensions {region_rows}x{region_cols}, the largest grid is 25x25")]
    Config {
        region_rows: usize,
        region_cols: usize,
    },
    /// Representation length does not match the number of grid cells.
    #[display("representation holds {actual} characters, expected {expected}")]
    Length { expected: usize, actual: usize },
    /// Unrecognised character in the representation.
    #[display("unrecognised character {character:?} at position {index}")]
    Character { character: char, index: usize },
    /// Decoded value does not fit the grid.
    #[display("value {value} at position {index} does not fit a grid of size {size}")]
    Value { value: u8, size: usize, index: usize },
    /// Cell accessor called with out-of-bounds indices.
    #[display("cell ({row}, {col}) is outside the {size}x{size} grid")]
    Range { row: usize, col: usize, size: usize },
    /// Value assignment outside the cell domain.
    #[display("value {value} is outside the cell domain [0, {domain})")]
    Domain { value: u8, domain: u8 },
    /// Value read from an unset cell.
    #[display("the cell value is not set")]
    Unset,
}
