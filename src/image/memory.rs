//! In-memory image store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{GridIo, GridIoError};
use crate::compute::Grid;

#[derive(Debug, Clone)]
struct StoredImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

/// Shared name → image map. Clones see the same images, so a test can keep a
/// handle while a run owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    images: Arc<Mutex<HashMap<String, StoredImage>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn images(&self) -> MutexGuard<'_, HashMap<String, StoredImage>> {
        self.images.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store raw pixels under `name`.
    pub fn insert(&self, name: &str, width: usize, height: usize, pixels: Vec<u8>) {
        self.images().insert(
            name.to_string(),
            StoredImage {
                width,
                height,
                pixels,
            },
        );
    }

    /// Store a grid under `name`.
    pub fn insert_grid(&self, name: &str, grid: &Grid) {
        self.insert(name, grid.width(), grid.height(), grid.to_bytes());
    }

    /// Pixels stored under `name`.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.images().get(name).map(|image| image.pixels.clone())
    }

    /// Image `name` decoded as a grid.
    pub fn grid(&self, name: &str) -> Option<Grid> {
        let images = self.images();
        let image = images.get(name)?;
        Grid::from_bytes(image.width, image.height, &image.pixels).ok()
    }

    /// Sorted names of all stored images.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.images().keys().cloned().collect();
        names.sort();
        names
    }
}

impl GridIo for MemoryStore {
    fn read_image(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>, GridIoError> {
        let images = self.images();
        let image = images
            .get(name)
            .ok_or_else(|| GridIoError::NotFound(name.to_string()))?;
        if image.width != width || image.height != height {
            return Err(GridIoError::DimensionMismatch {
                name: name.to_string(),
                width,
                height,
                actual_width: image.width,
                actual_height: image.height,
            });
        }
        Ok(image.pixels.clone())
    }

    fn write_image(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        pixels: &[u8],
    ) -> Result<(), GridIoError> {
        self.insert(name, width, height, pixels.to_vec());
        Ok(())
    }

    fn wait_idle(&mut self) -> Result<(), GridIoError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Cell;

    #[test]
    fn test_clones_share_images() {
        let store = MemoryStore::new();
        let mut handle = store.clone();
        handle.write_image("2x2", 2, 2, &[255, 0, 0, 255]).unwrap();

        assert_eq!(store.get("2x2"), Some(vec![255, 0, 0, 255]));
        assert_eq!(store.names(), vec!["2x2".to_string()]);
    }

    #[test]
    fn test_grid_roundtrip() {
        let grid = Grid::from_alive_cells(4, 4, [Cell::new(1, 2)]);
        let mut store = MemoryStore::new();
        store.insert_grid("4x4", &grid);

        let bytes = store.read_image("4x4", 4, 4).unwrap();
        assert_eq!(Grid::from_bytes(4, 4, &bytes).unwrap(), grid);
        assert_eq!(store.grid("4x4"), Some(grid));
    }

    #[test]
    fn test_read_errors() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.read_image("8x8", 8, 8),
            Err(GridIoError::NotFound(_))
        ));
        store.insert("8x8", 4, 16, vec![0; 64]);
        assert!(matches!(
            store.read_image("8x8", 8, 8),
            Err(GridIoError::DimensionMismatch { .. })
        ));
    }
}
