//! Toroidal binary grid for Game of Life.
//!
//! Cells are stored row-major as `bool` (`true` = alive). The byte form used by
//! the image collaborators maps alive to [`ALIVE`] (255) and dead to [`DEAD`] (0).

use serde::{Deserialize, Serialize};

/// Byte value of a live cell in an image stream.
pub const ALIVE: u8 = 255;

/// Byte value of a dead cell in an image stream.
pub const DEAD: u8 = 0;

/// Coordinate of a single cell (x = column, y = row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    #[inline]
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Errors converting a byte stream into a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("Expected {expected} bytes for grid, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Invalid cell byte {value} at offset {offset} (expected 0 or 255)")]
    InvalidCellByte { offset: usize, value: u8 },
}

/// Fixed-size toroidal grid of alive/dead cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create an all-dead grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Create a grid with the given cells alive. Out-of-range cells wrap.
    pub fn from_alive_cells<I>(width: usize, height: usize, alive: I) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut grid = Self::new(width, height);
        for cell in alive {
            grid.set(cell.x % width, cell.y % height, true);
        }
        grid
    }

    /// Decode a row-major byte stream with values in {0, 255}.
    pub fn from_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, GridError> {
        let expected = width * height;
        if bytes.len() != expected {
            return Err(GridError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        let cells = bytes
            .iter()
            .enumerate()
            .map(|(offset, &value)| match value {
                ALIVE => Ok(true),
                DEAD => Ok(false),
                _ => Err(GridError::InvalidCellByte { offset, value }),
            })
            .collect::<Result<Vec<bool>, GridError>>()?;

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Encode as a row-major byte stream with values in {0, 255}.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.cells
            .iter()
            .map(|&alive| if alive { ALIVE } else { DEAD })
            .collect()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Convert (x, y) coordinates to flat index.
    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.cells[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        let idx = self.idx(x, y);
        self.cells[idx] = alive;
    }

    /// All cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    /// Count the 8 neighbours of (x, y) that are alive, wrapping at every edge.
    pub fn alive_neighbours(&self, x: usize, y: usize) -> u8 {
        let (w, h) = (self.width, self.height);
        let up = (y + h - 1) % h;
        let down = (y + 1) % h;
        let left = (x + w - 1) % w;
        let right = (x + 1) % w;

        [
            (left, up),
            (x, up),
            (right, up),
            (left, y),
            (right, y),
            (left, down),
            (x, down),
            (right, down),
        ]
        .iter()
        .filter(|&&(nx, ny)| self.is_alive(nx, ny))
        .count() as u8
    }

    /// Number of alive cells.
    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Alive cells in row-major order.
    pub fn alive_cells(&self) -> Vec<Cell> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &alive)| alive)
            .map(|(i, _)| Cell::new(i % self.width, i / self.width))
            .collect()
    }
}
