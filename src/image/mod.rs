//! Image collaborators for reading and writing grids.
//!
//! A run reads its initial grid and writes snapshots through a [`GridIo`]
//! implementation. Pixels are row-major bytes, 255 for alive and 0 for dead.
//!
//! - [`PgmStore`]: binary PGM (`P5`) files, written on a background thread
//! - [`MemoryStore`]: shared in-memory map, for tests and benchmarks

mod memory;
mod pgm;
mod store;

use std::path::PathBuf;

pub use memory::MemoryStore;
pub use pgm::{PgmImage, decode_pgm, encode_pgm, read_pgm, write_pgm};
pub use store::PgmStore;

/// Source and sink of grid images.
pub trait GridIo {
    /// Read `width * height` row-major pixels of image `name`.
    fn read_image(&mut self, name: &str, width: usize, height: usize)
    -> Result<Vec<u8>, GridIoError>;

    /// Queue `pixels` to be persisted as image `name`.
    fn write_image(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        pixels: &[u8],
    ) -> Result<(), GridIoError>;

    /// Block until every queued write has completed.
    ///
    /// Reports the first write failure since the previous call.
    fn wait_idle(&mut self) -> Result<(), GridIoError>;
}

/// Image collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum GridIoError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed PGM: {0}")]
    Format(String),
    #[error("Image {name} is {actual_width}x{actual_height}, expected {width}x{height}")]
    DimensionMismatch {
        name: String,
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },
    #[error("Image {0} not found")]
    NotFound(String),
    #[error("Image writer has stopped")]
    WriterStopped,
}
