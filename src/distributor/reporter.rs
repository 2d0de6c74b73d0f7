//! Periodic alive-cell reporter.
//!
//! The reporter thread never touches the distributor's grid. On every tick it
//! offers a request on a zero-capacity channel and waits; the distributor
//! polls that channel between turns and, when it finds a waiting request,
//! hands over a copy of `(turn, grid)` and waits for the count to be emitted:
//!
//! ```text
//! reporter                     distributor
//!   tick
//!   request  ──rendezvous──▶   poll_request()
//!   recv     ◀──snapshot────   hand_off()
//!   emit AliveCellsCount
//!   done     ──────────────▶   (resumes turns)
//! ```

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender, select};
use log::{debug, warn};

use crate::compute::Grid;
use crate::event::Event;

/// Consistent `(turn, grid)` pair taken between turns.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub completed_turns: u32,
    pub grid: Grid,
}

/// Handle to the background reporter thread. Dropping it stops the thread.
pub struct Reporter {
    requests: Receiver<()>,
    snapshots: Sender<Snapshot>,
    done: Receiver<()>,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Reporter {
    /// Start a reporter firing every `interval` and emitting to `events`.
    pub fn spawn(interval: Duration, events: Sender<Event>) -> std::io::Result<Self> {
        let (request_tx, requests) = channel::bounded(0);
        let (snapshots, snapshot_rx) = channel::bounded(1);
        let (done_tx, done) = channel::bounded(1);
        let (stop, stop_rx) = channel::bounded::<()>(0);

        let handle = thread::Builder::new()
            .name("gol-reporter".into())
            .spawn(move || {
                report_loop(interval, events, request_tx, snapshot_rx, done_tx, stop_rx)
            })?;

        Ok(Self {
            requests,
            snapshots,
            done,
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Whether the reporter is waiting for a snapshot. Never blocks.
    pub fn poll_request(&self) -> bool {
        self.requests.try_recv().is_ok()
    }

    /// Hand over a snapshot and wait until its count has been emitted.
    ///
    /// Returns `false` if the reporter has gone away; the report is skipped.
    pub fn hand_off(&self, completed_turns: u32, grid: &Grid) -> bool {
        let snapshot = Snapshot {
            completed_turns,
            grid: grid.clone(),
        };
        if self.snapshots.send(snapshot).is_err() || self.done.recv().is_err() {
            debug!("Reporter unavailable, skipping report at turn {}", completed_turns);
            return false;
        }
        true
    }

    /// Stop the reporter thread and wait for it to exit.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        // Disconnecting the stop channel wakes every select in the loop.
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Reporter thread panicked");
            }
        }
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

fn report_loop(
    interval: Duration,
    events: Sender<Event>,
    requests: Sender<()>,
    snapshots: Receiver<Snapshot>,
    done: Sender<()>,
    stop: Receiver<()>,
) {
    let ticker = channel::tick(interval);
    loop {
        let stopped = select! {
            recv(stop) -> _ => true,
            recv(ticker) -> _ => false,
        };
        if stopped {
            break;
        }

        let Some(snapshot) = request_snapshot(&requests, &snapshots, &stop) else {
            break;
        };

        let cells_count = snapshot.grid.alive_count();
        let _ = events.send(Event::AliveCellsCount {
            completed_turns: snapshot.completed_turns,
            cells_count,
        });
        if done.send(()).is_err() {
            break;
        }
    }
    debug!("Reporter stopped");
}

/// Rendezvous with the distributor and receive its snapshot. `None` once
/// stopped.
fn request_snapshot(
    requests: &Sender<()>,
    snapshots: &Receiver<Snapshot>,
    stop: &Receiver<()>,
) -> Option<Snapshot> {
    let offered = select! {
        send(requests, ()) -> res => res.is_ok(),
        recv(stop) -> _ => false,
    };
    if !offered {
        return None;
    }

    select! {
        recv(snapshots) -> snapshot => snapshot.ok(),
        recv(stop) -> _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Cell;
    use std::time::Instant;

    fn wait_for_request(reporter: &Reporter) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if reporter.poll_request() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        false
    }

    #[test]
    fn test_hand_off_emits_count() {
        let (tx, rx) = channel::unbounded();
        let reporter = Reporter::spawn(Duration::from_millis(5), tx).unwrap();
        let grid = Grid::from_alive_cells(4, 4, [Cell::new(0, 0), Cell::new(3, 3)]);

        assert!(wait_for_request(&reporter));
        assert!(reporter.hand_off(12, &grid));
        // Emission completes before hand_off returns.
        assert_eq!(
            rx.try_recv().unwrap(),
            Event::AliveCellsCount {
                completed_turns: 12,
                cells_count: 2
            }
        );

        reporter.shutdown();
        assert!(rx.recv().is_err(), "stream closes once the reporter stops");
    }

    #[test]
    fn test_no_reports_without_hand_off() {
        let (tx, rx) = channel::unbounded();
        let reporter = Reporter::spawn(Duration::from_millis(1), tx).unwrap();
        thread::sleep(Duration::from_millis(20));
        drop(reporter);
        assert_eq!(rx.iter().count(), 0);
    }

    #[test]
    fn test_hand_off_after_reporter_exit_is_skipped() {
        let (tx, rx) = channel::unbounded();
        let mut reporter = Reporter::spawn(Duration::from_millis(1), tx).unwrap();
        reporter.stop_and_join();

        let grid = Grid::from_alive_cells(4, 4, [Cell::new(1, 1)]);
        assert!(!reporter.hand_off(3, &grid));
        assert!(!reporter.poll_request());
        assert_eq!(rx.iter().count(), 0);
    }

    #[test]
    fn test_poll_without_tick() {
        let (tx, _rx) = channel::unbounded();
        let reporter = Reporter::spawn(Duration::from_secs(60), tx).unwrap();
        assert!(!reporter.poll_request());
    }
}
