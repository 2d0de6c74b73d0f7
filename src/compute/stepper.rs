//! Rule evaluation for one band of rows.
//!
//! Reads only the previous grid and writes only the caller's output slice, so
//! disjoint bands can be stepped concurrently.

use crossbeam::channel::Sender;

use super::{Band, Cell, Grid};
use crate::event::Event;

/// Standard B3/S23 rule: survive on 2 or 3 neighbours, birth on exactly 3.
#[inline]
pub fn next_state(alive: bool, neighbours: u8) -> bool {
    match (alive, neighbours) {
        (true, 2) | (true, 3) => true, // Survival
        (false, 3) => true,            // Birth
        _ => false,                    // Death or stays dead
    }
}

/// Compute the next state of `band` rows into `out`.
///
/// `out` holds exactly `band.len() * prev.width()` cells. Every cell whose
/// state changes is reported once as [`Event::CellFlipped`] tagged with
/// `completed_turns`. Send failures (consumer gone) are ignored.
///
/// Returns the number of flipped cells.
pub fn step_band_into(
    prev: &Grid,
    band: Band,
    completed_turns: u32,
    out: &mut [bool],
    events: Option<&Sender<Event>>,
) -> usize {
    let width = prev.width();
    debug_assert_eq!(out.len(), band.len() * width);

    let mut flipped = 0;
    for (row_out, y) in out.chunks_mut(width.max(1)).zip(band.rows()) {
        for (x, cell_out) in row_out.iter_mut().enumerate() {
            let alive = prev.is_alive(x, y);
            let next = next_state(alive, prev.alive_neighbours(x, y));
            *cell_out = next;

            if next != alive {
                flipped += 1;
                if let Some(tx) = events {
                    let _ = tx.send(Event::CellFlipped {
                        completed_turns,
                        cell: Cell::new(x, y),
                    });
                }
            }
        }
    }
    flipped
}

/// Compute the next state of `band` rows as a freshly allocated sub-grid.
pub fn step_band(
    prev: &Grid,
    band: Band,
    completed_turns: u32,
    events: Option<&Sender<Event>>,
) -> Vec<bool> {
    let mut out = vec![false; band.len() * prev.width()];
    step_band_into(prev, band, completed_turns, &mut out, events);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::unbounded;

    fn blinker() -> Grid {
        // Horizontal blinker centred at (2, 2) on a 5x5 torus.
        Grid::from_alive_cells(5, 5, [Cell::new(1, 2), Cell::new(2, 2), Cell::new(3, 2)])
    }

    #[test]
    fn test_rule_table() {
        for n in 0..=8u8 {
            assert_eq!(next_state(true, n), n == 2 || n == 3, "alive with {}", n);
            assert_eq!(next_state(false, n), n == 3, "dead with {}", n);
        }
    }

    #[test]
    fn test_blinker_full_band() {
        let grid = blinker();
        let next = step_band(&grid, Band::new(0, 5), 1, None);
        let expected =
            Grid::from_alive_cells(5, 5, [Cell::new(2, 1), Cell::new(2, 2), Cell::new(2, 3)]);
        assert_eq!(next, expected.cells());
    }

    #[test]
    fn test_sub_band_matches_full_rows() {
        let grid = blinker();
        let full = step_band(&grid, Band::new(0, 5), 1, None);
        let middle = step_band(&grid, Band::new(1, 4), 1, None);
        assert_eq!(middle, &full[5..20]);
    }

    #[test]
    fn test_flips_reported_once_per_changed_cell() {
        let grid = blinker();
        let (tx, rx) = unbounded();
        let next = step_band(&grid, Band::new(0, 5), 4, Some(&tx));
        drop(tx);

        let flips: Vec<Event> = rx.iter().collect();
        // Two ends die, two cells above and below are born.
        assert_eq!(flips.len(), 4);

        let changed = grid
            .cells()
            .iter()
            .zip(next.iter())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(changed, flips.len());

        for event in flips {
            match event {
                Event::CellFlipped {
                    completed_turns,
                    cell,
                } => {
                    assert_eq!(completed_turns, 4);
                    assert_ne!(grid.is_alive(cell.x, cell.y), next[grid.idx(cell.x, cell.y)]);
                }
                other => panic!("unexpected event {:?}", other),
            }
        }
    }

    #[test]
    fn test_empty_band() {
        let grid = blinker();
        assert!(step_band(&grid, Band::new(5, 5), 1, None).is_empty());
    }

    #[test]
    fn test_birth_across_edges() {
        // Three cells straddling the wrap point give birth at (0, 0).
        let grid = Grid::from_alive_cells(
            6,
            6,
            [Cell::new(5, 5), Cell::new(0, 5), Cell::new(1, 5)],
        );
        let next = step_band(&grid, Band::new(0, 1), 1, None);
        assert!(next[0]);
    }
}
