//! Life Distributor - turn-based parallel Game of Life.
//!
//! This crate advances a toroidal binary grid across a configurable number of
//! turns, splitting each turn across a pool of workers, and reports progress
//! as a typed event stream. A run can be paused, saved or quit through key
//! presses, and a background reporter periodically samples the alive count.
//!
//! # Architecture
//!
//! - `compute`: Grid, rule evaluation, row partitioning and the turn engine
//! - `distributor`: Main loop, interactive commands and the periodic reporter
//! - `event`: Events emitted to the consumer
//! - `image`: Reading and writing grids (PGM files or in memory)
//! - `schema`: Run parameters and seed patterns
//!
//! # Example
//!
//! ```rust,no_run
//! use crossbeam::channel;
//! use life_distributor::{
//!     distributor::run,
//!     event::Event,
//!     image::MemoryStore,
//!     schema::{Params, Pattern, Seed},
//! };
//!
//! let params = Params::new(64, 64, 100, 4);
//!
//! // Seed the input image
//! let store = MemoryStore::new();
//! let seed = Seed { pattern: Pattern::Glider { x: 0, y: 0 } };
//! store.insert_grid(&params.input_name(), &seed.generate(64, 64));
//!
//! let (events_tx, events_rx) = channel::unbounded();
//! let (_keys_tx, keys_rx) = channel::unbounded();
//! let summary = run(params, store, events_tx, keys_rx).unwrap();
//!
//! for event in events_rx.iter() {
//!     if let Event::FinalTurnComplete { alive, .. } = event {
//!         println!("{} cells alive after {} turns", alive.len(), summary.completed_turns);
//!     }
//! }
//! ```

pub mod compute;
pub mod distributor;
pub mod event;
pub mod image;
pub mod schema;

// Re-export commonly used types
pub use compute::{Cell, Grid, TurnEngine};
pub use distributor::{RunError, RunSummary, run};
pub use event::{Event, RunState};
pub use schema::{Params, Pattern, RunConfig, Seed};
