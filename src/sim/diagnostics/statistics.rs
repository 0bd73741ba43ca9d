use serde::Serialize;

use crate::sim::thermal::{CELSIUS_OFFSET, TemperatureGrid};

/// Summary statistics of a temperature grid [K].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridStatistics {
    pub min_k: f64,
    pub max_k: f64,
    pub mean_k: f64,
    /// Population standard deviation.
    pub std_dev_k: f64,
    pub cells: usize,
}

impl GridStatistics {
    /// Computes min, max, mean and standard deviation in a single pass (Welford).
    pub fn from_grid(grid: &TemperatureGrid) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut mean = 0.0;
        let mut m2 = 0.0;
        let mut n = 0usize;
        for &t in grid.iter() {
            n += 1;
            min = min.min(t);
            max = max.max(t);
            let delta = t - mean;
            mean += delta / n as f64;
            m2 += delta * (t - mean);
        }
        let std_dev_k = if n > 0 { (m2 / n as f64).sqrt() } else { 0.0 };
        Self {
            min_k: min,
            max_k: max,
            mean_k: mean,
            std_dev_k,
            cells: n,
        }
    }

    pub fn min_c(&self) -> f64 {
        self.min_k - CELSIUS_OFFSET
    }

    pub fn max_c(&self) -> f64 {
        self.max_k - CELSIUS_OFFSET
    }

    pub fn mean_c(&self) -> f64 {
        self.mean_k - CELSIUS_OFFSET
    }
}
