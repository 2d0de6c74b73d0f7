//! Compute module - Grid representation and parallel turn computation.

mod engine;
mod grid;
mod partition;
mod stepper;

pub use engine::*;
pub use grid::*;
pub use partition::*;
pub use stepper::*;
