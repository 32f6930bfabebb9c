use crate::error::FlagError;
use crate::stats;

/// Running element-wise sum over per-capture power matrices. Only one buffer
/// is kept; captures can be dropped as soon as they are added. The first
/// capture fixes the expected channel x bin shape.
pub struct SpectrumAccumulator {
    sum: Vec<Vec<f64>>,
    count: usize,
}

impl SpectrumAccumulator {
    pub fn new() -> Self {
        Self {
            sum: Vec::new(),
            count: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// (channels, bins) of the accumulated shape; (0, 0) before the first add.
    pub fn shape(&self) -> (usize, usize) {
        (self.sum.len(), self.sum.first().map_or(0, |row| row.len()))
    }

    pub fn add(&mut self, spectra: &[Vec<f64>]) -> Result<(), FlagError> {
        let found_chans = spectra.len();
        let found_bins = spectra.first().map_or(0, |row| row.len());
        let (expected_chans, expected_bins) = if self.count == 0 {
            (found_chans, found_bins)
        } else {
            self.shape()
        };
        if found_chans != expected_chans || spectra.iter().any(|row| row.len() != expected_bins) {
            return Err(FlagError::Consistency {
                expected_chans,
                expected_bins,
                found_chans,
                found_bins,
            });
        }

        if self.count == 0 {
            self.sum = spectra.to_vec();
        } else {
            for (acc_row, row) in self.sum.iter_mut().zip(spectra) {
                for (acc, &value) in acc_row.iter_mut().zip(row) {
                    *acc += value;
                }
            }
        }
        self.count += 1;
        Ok(())
    }

    /// Arithmetic mean over all added captures.
    pub fn mean(&self) -> Result<Vec<Vec<f64>>, FlagError> {
        if self.count == 0 {
            return Err(FlagError::Empty);
        }
        let norm = self.count as f64;
        Ok(self
            .sum
            .iter()
            .map(|row| row.iter().map(|&value| value / norm).collect())
            .collect())
    }
}

/// Per-bin median across channels of a channel x bin matrix.
pub fn median_spectrum(spec: &[Vec<f64>]) -> Vec<f64> {
    let bins = spec.first().map_or(0, |row| row.len());
    (0..bins)
        .map(|bin| {
            let column: Vec<f64> = spec.iter().map(|row| row[bin]).collect();
            stats::median(&column)
        })
        .collect()
}
