//! Row partitioning of the grid across workers.

use std::ops::Range;

/// Contiguous half-open row range `[start, end)` handled by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub start: usize,
    pub end: usize,
}

impl Band {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `height` rows into `workers` ascending bands.
///
/// Every band gets `height / workers` rows and the first `height % workers`
/// bands one extra. With more workers than rows the trailing bands are empty
/// (`start == end == height`). A worker count of zero is treated as one.
pub fn partition_rows(height: usize, workers: usize) -> Vec<Band> {
    let workers = workers.max(1);
    let base = height / workers;
    let extra = height % workers;

    let mut bands = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        let len = base + usize::from(i < extra);
        bands.push(Band::new(start, start + len));
        start += len;
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_even_split() {
        assert_eq!(
            partition_rows(16, 4),
            vec![
                Band::new(0, 4),
                Band::new(4, 8),
                Band::new(8, 12),
                Band::new(12, 16)
            ]
        );
    }

    #[test]
    fn test_remainder_goes_to_first_bands() {
        assert_eq!(
            partition_rows(10, 4),
            vec![
                Band::new(0, 3),
                Band::new(3, 6),
                Band::new(6, 8),
                Band::new(8, 10)
            ]
        );
    }

    #[test]
    fn test_more_workers_than_rows() {
        let bands = partition_rows(3, 5);
        assert_eq!(bands.len(), 5);
        assert_eq!(&bands[..3], &[Band::new(0, 1), Band::new(1, 2), Band::new(2, 3)]);
        assert!(bands[3..].iter().all(|b| b.is_empty() && b.start == 3));
    }

    #[test]
    fn test_zero_workers_is_single_band() {
        assert_eq!(partition_rows(7, 0), vec![Band::new(0, 7)]);
    }

    proptest! {
        #[test]
        fn prop_bands_cover_rows_once(height in 0usize..512, workers in 1usize..64) {
            let bands = partition_rows(height, workers);
            prop_assert_eq!(bands.len(), workers);

            let mut next = 0;
            for band in &bands {
                prop_assert_eq!(band.start, next);
                prop_assert!(band.start <= band.end);
                next = band.end;
            }
            prop_assert_eq!(next, height);

            let max = bands.iter().map(Band::len).max().unwrap_or(0);
            let min = bands.iter().map(Band::len).min().unwrap_or(0);
            prop_assert!(max - min <= 1);
        }
    }
}
