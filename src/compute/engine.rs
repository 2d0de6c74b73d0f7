//! Turn engine - advances the grid by one turn across a pool of workers.
//!
//! Each turn the rows are partitioned into bands, one scoped task per
//! non-empty band steps its rows against the shared previous grid and writes
//! straight into its own slice of the next grid. The scope end is the barrier.

use crossbeam::channel::Sender;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use super::{Grid, partition_rows, step_band_into};
use crate::event::Event;

/// Parallel Game of Life stepper with a fixed worker count.
pub struct TurnEngine {
    pool: ThreadPool,
    threads: usize,
}

impl TurnEngine {
    /// Create an engine with `threads` workers (zero is treated as one).
    pub fn new(threads: usize) -> Result<Self, ThreadPoolBuildError> {
        let threads = threads.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("gol-worker-{}", i))
            .build()?;
        Ok(Self { pool, threads })
    }

    /// Compute the grid following `prev`.
    ///
    /// Flips are emitted tagged with `completed_turns` before this returns.
    /// The result does not depend on the worker count.
    pub fn next_turn(
        &self,
        prev: &Grid,
        completed_turns: u32,
        events: Option<&Sender<Event>>,
    ) -> Grid {
        let width = prev.width();
        let bands = partition_rows(prev.height(), self.threads);
        let mut next = Grid::new(width, prev.height());

        if self.threads == 1 {
            step_band_into(prev, bands[0], completed_turns, next.cells_mut(), events);
            return next;
        }

        self.pool.scope(|s| {
            let mut rest = next.cells_mut();
            for band in bands.into_iter().filter(|b| !b.is_empty()) {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(band.len() * width);
                rest = tail;
                s.spawn(move |_| {
                    step_band_into(prev, band, completed_turns, chunk, events);
                });
            }
        });

        next
    }

    /// Advance `grid` by `turns` turns without emitting events.
    pub fn run(&self, grid: &Grid, turns: u32) -> Grid {
        let mut current = grid.clone();
        for turn in 1..=turns {
            current = self.next_turn(&current, turn, None);
        }
        current
    }
}
