//! Seed types for generating initial Game of Life grids.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::compute::{Cell, Grid};

/// Seed pattern used to build an initial grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            pattern: Pattern::Random {
                density: 0.25,
                seed: 42,
            },
        }
    }
}

/// Predefined patterns for initialization.
///
/// Positions are the top-left corner of the pattern's bounding box and wrap
/// around the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// All cells dead.
    Empty,
    /// 2x2 still life.
    Block { x: usize, y: usize },
    /// Period-2 horizontal oscillator.
    Blinker { x: usize, y: usize },
    /// Glider travelling one cell down and right every 4 turns.
    Glider { x: usize, y: usize },
    /// Each cell alive with probability `density`.
    Random {
        /// Probability of a live cell (0.0-1.0).
        density: f64,
        /// Random seed.
        seed: u64,
    },
    /// Explicit list of alive cells.
    Custom { cells: Vec<Cell> },
}

impl Seed {
    /// Generate the initial grid from this seed.
    pub fn generate(&self, width: usize, height: usize) -> Grid {
        match &self.pattern {
            Pattern::Empty => Grid::new(width, height),
            Pattern::Block { x, y } => place(width, height, *x, *y, &[(0, 0), (1, 0), (0, 1), (1, 1)]),
            Pattern::Blinker { x, y } => place(width, height, *x, *y, &[(0, 0), (1, 0), (2, 0)]),
            Pattern::Glider { x, y } => place(
                width,
                height,
                *x,
                *y,
                &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
            ),
            Pattern::Random { density, seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                let density = density.clamp(0.0, 1.0);
                let mut grid = Grid::new(width, height);
                for y in 0..height {
                    for x in 0..width {
                        grid.set(x, y, rng.gen_bool(density));
                    }
                }
                grid
            }
            Pattern::Custom { cells } => Grid::from_alive_cells(width, height, cells.iter().copied()),
        }
    }
}

fn place(width: usize, height: usize, x: usize, y: usize, offsets: &[(usize, usize)]) -> Grid {
    Grid::from_alive_cells(
        width,
        height,
        offsets.iter().map(|&(dx, dy)| Cell::new(x + dx, y + dy)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glider_cells() {
        let seed = Seed {
            pattern: Pattern::Glider { x: 2, y: 3 },
        };
        let grid = seed.generate(8, 8);
        assert_eq!(
            grid.alive_cells(),
            vec![
                Cell::new(3, 3),
                Cell::new(4, 4),
                Cell::new(2, 5),
                Cell::new(3, 5),
                Cell::new(4, 5)
            ]
        );
    }

    #[test]
    fn test_pattern_wraps() {
        let seed = Seed {
            pattern: Pattern::Block { x: 3, y: 3 },
        };
        let grid = seed.generate(4, 4);
        assert!(grid.is_alive(3, 3));
        assert!(grid.is_alive(0, 0));
        assert_eq!(grid.alive_count(), 4);
    }

    #[test]
    fn test_random_is_deterministic() {
        let seed = Seed::default();
        let a = seed.generate(32, 32);
        let b = seed.generate(32, 32);
        assert_eq!(a, b);
        assert!(a.alive_count() > 0);
    }

    #[test]
    fn test_seed_json() {
        let json = r#"{"pattern": {"type": "Blinker", "x": 1, "y": 1}}"#;
        let seed: Seed = serde_json::from_str(json).unwrap();
        assert_eq!(seed.generate(5, 5).alive_count(), 3);
    }
}
