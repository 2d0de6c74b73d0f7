//! Distributor - owns the grid and drives a run.
//!
//! Each iteration of the main loop picks one trigger, in priority order:
//!
//! 1. A pending reporter request: hand off a snapshot, no turn advance
//! 2. A pending key press: pause, save or quit
//! 3. Otherwise: advance one turn on the [`TurnEngine`]
//!
//! The run ends when the configured turns are exhausted or on quit. The final
//! grid is written, `FinalTurnComplete` is emitted, the image collaborator is
//! drained, and `StateChange(Quitting)` is the last event before the stream
//! closes. Error paths return early; dropping the distributor and the reporter
//! still closes the stream.

mod command;
mod reporter;

pub use command::Command;
pub use reporter::{Reporter, Snapshot};

use crossbeam::channel::{Receiver, Sender};
use log::{debug, info, warn};
use rayon::ThreadPoolBuildError;

use crate::compute::{Grid, GridError, TurnEngine};
use crate::event::{Event, RunState};
use crate::image::{GridIo, GridIoError};
use crate::schema::{ConfigError, Params};

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Invalid parameters: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid input image: {0}")]
    Grid(#[from] GridError),
    #[error(transparent)]
    Io(#[from] GridIoError),
    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] ThreadPoolBuildError),
    #[error("Failed to start reporter: {0}")]
    Reporter(#[source] std::io::Error),
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub completed_turns: u32,
    pub grid: Grid,
    /// Whether the run was ended early by a quit command.
    pub quit: bool,
}

/// Run a full simulation.
///
/// Reads the initial grid through `io`, runs `params.turns` turns and returns
/// the final state. `events` is closed when this returns, on success or error.
pub fn run<I: GridIo>(
    params: Params,
    io: I,
    events: Sender<Event>,
    key_presses: Receiver<char>,
) -> Result<RunSummary, RunError> {
    Distributor::new(params, io, events, key_presses)?.execute()
}

/// Scheduler owning the canonical grid and turn counter.
pub struct Distributor<I: GridIo> {
    params: Params,
    io: I,
    engine: TurnEngine,
    events: Sender<Event>,
    key_presses: Receiver<char>,
    grid: Grid,
    turn: u32,
    state: RunState,
}

impl<I: GridIo> Distributor<I> {
    /// Validate `params`, load the initial grid and report its alive cells as
    /// turn-0 flips.
    pub fn new(
        params: Params,
        mut io: I,
        events: Sender<Event>,
        key_presses: Receiver<char>,
    ) -> Result<Self, RunError> {
        params.validate()?;
        let engine = TurnEngine::new(params.threads)?;

        let (width, height) = (params.image_width, params.image_height);
        let pixels = io.read_image(&params.input_name(), width, height)?;
        let grid = Grid::from_bytes(width, height, &pixels)?;

        for cell in grid.alive_cells() {
            let _ = events.send(Event::CellFlipped {
                completed_turns: 0,
                cell,
            });
        }

        Ok(Self {
            params,
            io,
            engine,
            events,
            key_presses,
            grid,
            turn: 0,
            state: RunState::Running,
        })
    }

    /// Run the main loop and the shutdown sequence.
    pub fn execute(mut self) -> Result<RunSummary, RunError> {
        info!(
            "Running {}x{} for {} turns on {} threads",
            self.params.image_width, self.params.image_height, self.params.turns, self.params.threads
        );

        let reporter = Reporter::spawn(self.params.report_interval(), self.events.clone())
            .map_err(RunError::Reporter)?;
        self.run_turns(&reporter)?;
        // Stopped before the final events so StateChange is the last one.
        reporter.shutdown();

        self.finish()
    }

    fn run_turns(&mut self, reporter: &Reporter) -> Result<(), RunError> {
        while self.turn < self.params.turns && self.state != RunState::Quitting {
            if reporter.poll_request() {
                reporter.hand_off(self.turn, &self.grid);
                continue;
            }

            if let Ok(key) = self.key_presses.try_recv() {
                match Command::from_key(key) {
                    Some(command) => self.dispatch(command)?,
                    None => debug!("Ignoring key {:?}", key),
                }
                continue;
            }

            self.advance();
        }
        Ok(())
    }

    fn dispatch(&mut self, command: Command) -> Result<(), RunError> {
        match command {
            Command::Pause => self.pause(),
            Command::Save => self.save(),
            Command::Quit => self.quit(),
        }
    }

    /// Block until a second command arrives, then resume.
    fn pause(&mut self) -> Result<(), RunError> {
        info!("Paused at turn {}", self.turn);
        self.set_state(RunState::Paused);

        loop {
            let Ok(key) = self.key_presses.recv() else {
                warn!("Key press channel closed while paused, resuming");
                break;
            };
            match Command::from_key(key) {
                Some(Command::Pause) => {
                    self.advance();
                    break;
                }
                Some(Command::Save) => {
                    self.save()?;
                    break;
                }
                Some(Command::Quit) => return self.quit(),
                None => debug!("Ignoring key {:?} while paused", key),
            }
        }

        info!("Resuming at turn {}", self.turn);
        self.set_state(RunState::Running);
        Ok(())
    }

    fn save(&mut self) -> Result<(), RunError> {
        self.write_output()?;
        self.emit(Event::TurnComplete {
            completed_turns: self.turn,
        });
        Ok(())
    }

    fn quit(&mut self) -> Result<(), RunError> {
        info!("Quitting at turn {}", self.turn);
        self.write_output()?;
        self.emit_final();
        self.state = RunState::Quitting;
        Ok(())
    }

    fn advance(&mut self) {
        let next_turn = self.turn + 1;
        self.grid = self
            .engine
            .next_turn(&self.grid, next_turn, Some(&self.events));
        self.turn = next_turn;
        self.emit(Event::TurnComplete {
            completed_turns: next_turn,
        });
    }

    fn finish(mut self) -> Result<RunSummary, RunError> {
        let quit = self.state == RunState::Quitting;
        if !quit {
            self.write_output()?;
            self.emit_final();
            self.state = RunState::Quitting;
        }

        self.io.wait_idle()?;
        self.emit(Event::StateChange {
            completed_turns: self.turn,
            new_state: RunState::Quitting,
        });
        info!(
            "Finished after {} turns with {} cells alive",
            self.turn,
            self.grid.alive_count()
        );

        Ok(RunSummary {
            completed_turns: self.turn,
            grid: self.grid,
            quit,
        })
    }

    fn write_output(&mut self) -> Result<(), RunError> {
        let name = self.params.output_name(self.turn);
        self.io.write_image(
            &name,
            self.grid.width(),
            self.grid.height(),
            &self.grid.to_bytes(),
        )?;
        info!("Saved {} at turn {}", name, self.turn);
        Ok(())
    }

    fn emit_final(&self) {
        self.emit(Event::FinalTurnComplete {
            completed_turns: self.turn,
            alive: self.grid.alive_cells(),
        });
    }

    fn set_state(&mut self, state: RunState) {
        self.state = state;
        self.emit(Event::StateChange {
            completed_turns: self.turn,
            new_state: state,
        });
    }

    fn emit(&self, event: Event) {
        // A consumer that stopped listening does not stop the run.
        let _ = self.events.send(event);
    }
}
