//! Events emitted to the consumer of a run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compute::Cell;

/// Execution state of the distributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Running,
    Paused,
    /// Terminal.
    Quitting,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Running => write!(f, "Running"),
            RunState::Paused => write!(f, "Paused"),
            RunState::Quitting => write!(f, "Quitting"),
        }
    }
}

/// A single entry in the event stream.
///
/// `completed_turns` is the turn counter at the time of emission. Flips and
/// turn completions produced by an advance carry the counter *after* it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A cell changed state while computing `completed_turns`.
    CellFlipped { completed_turns: u32, cell: Cell },
    TurnComplete { completed_turns: u32 },
    /// Periodic liveness snapshot from the reporter.
    AliveCellsCount {
        completed_turns: u32,
        cells_count: usize,
    },
    /// Final alive set, enumerated directly from the final grid.
    FinalTurnComplete {
        completed_turns: u32,
        alive: Vec<Cell>,
    },
    StateChange {
        completed_turns: u32,
        new_state: RunState,
    },
}

impl Event {
    pub fn completed_turns(&self) -> u32 {
        match self {
            Event::CellFlipped {
                completed_turns, ..
            }
            | Event::TurnComplete { completed_turns }
            | Event::AliveCellsCount {
                completed_turns, ..
            }
            | Event::FinalTurnComplete {
                completed_turns, ..
            }
            | Event::StateChange {
                completed_turns, ..
            } => *completed_turns,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::CellFlipped {
                completed_turns,
                cell,
            } => write!(f, "Turn {}: cell ({}, {}) flipped", completed_turns, cell.x, cell.y),
            Event::TurnComplete { completed_turns } => {
                write!(f, "Turn {} complete", completed_turns)
            }
            Event::AliveCellsCount {
                completed_turns,
                cells_count,
            } => write!(f, "Turn {}: {} cells alive", completed_turns, cells_count),
            Event::FinalTurnComplete {
                completed_turns,
                alive,
            } => write!(
                f,
                "Final turn {} complete: {} cells alive",
                completed_turns,
                alive.len()
            ),
            Event::StateChange {
                completed_turns,
                new_state,
            } => write!(f, "Turn {}: {}", completed_turns, new_state),
        }
    }
}
