//! Filesystem PGM store with a background writer.
//!
//! Reads are synchronous. Writes are queued to a dedicated thread so a save
//! never stalls the turn loop; [`GridIo::wait_idle`] drains the queue.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, error, warn};

use super::{GridIo, GridIoError, read_pgm, write_pgm};

enum WriteJob {
    Write {
        path: PathBuf,
        width: usize,
        height: usize,
        pixels: Vec<u8>,
    },
    /// Reply with the first failure since the last flush once all earlier
    /// jobs are done.
    Flush(Sender<Option<GridIoError>>),
}

/// Reads `<input_dir>/<name>.pgm`, writes `<output_dir>/<name>.pgm`.
pub struct PgmStore {
    input_dir: PathBuf,
    output_dir: PathBuf,
    jobs: Option<Sender<WriteJob>>,
    writer: Option<JoinHandle<()>>,
}

impl PgmStore {
    /// Create the store, creating `output_dir` if needed.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        input_dir: P,
        output_dir: Q,
    ) -> Result<Self, GridIoError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir).map_err(|source| GridIoError::Io {
            path: output_dir.clone(),
            source,
        })?;

        let (jobs, rx) = channel::unbounded();
        let writer = thread::Builder::new()
            .name("pgm-writer".into())
            .spawn(move || write_loop(rx))
            .map_err(|source| GridIoError::Io {
                path: output_dir.clone(),
                source,
            })?;

        Ok(Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            output_dir,
            jobs: Some(jobs),
            writer: Some(writer),
        })
    }

    /// Path image `name` is read from.
    pub fn input_path(&self, name: &str) -> PathBuf {
        self.input_dir.join(format!("{}.pgm", name))
    }

    /// Path image `name` is written to.
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.pgm", name))
    }

    fn send(&self, job: WriteJob) -> Result<(), GridIoError> {
        self.jobs
            .as_ref()
            .ok_or(GridIoError::WriterStopped)?
            .send(job)
            .map_err(|_| GridIoError::WriterStopped)
    }
}

impl GridIo for PgmStore {
    fn read_image(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>, GridIoError> {
        let path = self.input_path(name);
        if !path.exists() {
            return Err(GridIoError::NotFound(path.display().to_string()));
        }

        let image = read_pgm(&path)?;
        if image.width != width || image.height != height {
            return Err(GridIoError::DimensionMismatch {
                name: name.to_string(),
                width,
                height,
                actual_width: image.width,
                actual_height: image.height,
            });
        }
        debug!("Read {} ({}x{})", path.display(), width, height);
        Ok(image.pixels)
    }

    fn write_image(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        pixels: &[u8],
    ) -> Result<(), GridIoError> {
        self.send(WriteJob::Write {
            path: self.output_path(name),
            width,
            height,
            pixels: pixels.to_vec(),
        })
    }

    fn wait_idle(&mut self) -> Result<(), GridIoError> {
        let (ack_tx, ack_rx) = channel::bounded(1);
        self.send(WriteJob::Flush(ack_tx))?;
        match ack_rx.recv() {
            Ok(None) => Ok(()),
            Ok(Some(err)) => Err(err),
            Err(_) => Err(GridIoError::WriterStopped),
        }
    }
}

impl Drop for PgmStore {
    fn drop(&mut self) {
        // Closing the queue lets the writer finish outstanding jobs and exit.
        self.jobs.take();
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                warn!("PGM writer thread panicked");
            }
        }
    }
}

fn write_loop(rx: Receiver<WriteJob>) {
    let mut pending: Option<GridIoError> = None;
    for job in rx {
        match job {
            WriteJob::Write {
                path,
                width,
                height,
                pixels,
            } => match write_pgm(&path, width, height, &pixels) {
                Ok(()) => debug!("Wrote {}", path.display()),
                Err(err) => {
                    error!("Failed to write {}: {}", path.display(), err);
                    pending.get_or_insert(err);
                }
            },
            WriteJob::Flush(ack) => {
                let _ = ack.send(pending.take());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read_back() {
        let dir = tempdir().unwrap();
        let mut store = PgmStore::new(dir.path().join("out"), dir.path().join("out")).unwrap();
        let pixels: Vec<u8> = (0..64).map(|i| if i % 5 == 0 { 255 } else { 0 }).collect();

        store.write_image("8x8x3", 8, 8, &pixels).unwrap();
        store.wait_idle().unwrap();

        assert!(store.output_path("8x8x3").exists());
        assert_eq!(store.read_image("8x8x3", 8, 8).unwrap(), pixels);
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let mut store = PgmStore::new(dir.path(), dir.path().join("out")).unwrap();
        assert!(matches!(
            store.read_image("16x16", 16, 16),
            Err(GridIoError::NotFound(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let dir = tempdir().unwrap();
        write_pgm(&dir.path().join("4x4.pgm"), 2, 8, &[0; 16]).unwrap();
        let mut store = PgmStore::new(dir.path(), dir.path().join("out")).unwrap();
        assert!(matches!(
            store.read_image("4x4", 4, 4),
            Err(GridIoError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_write_failure_surfaces_on_idle() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let mut store = PgmStore::new(dir.path(), &out).unwrap();
        fs::remove_dir_all(&out).unwrap();

        store.write_image("4x4x0", 4, 4, &[0; 16]).unwrap();
        assert!(matches!(store.wait_idle(), Err(GridIoError::Io { .. })));
        // The failure is reported once.
        assert!(store.wait_idle().is_ok());
    }
}
