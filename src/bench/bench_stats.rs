//! Summary statistics over trial samples

use serde::Serialize;

/// Descriptive statistics of one sample set
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (n - 1); zero for fewer than two samples
    pub std_dev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Median, averaging the two middle samples for even counts
    pub median: f64,
}

impl Summary {
    /// Summarize `samples`; an empty set yields all zeros
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let std_dev = if samples.len() > 1 {
            let squares: f64 = samples.iter().map(|s| (s - mean).powi(2)).sum();
            (squares / (n - 1.0)).sqrt()
        } else {
            0.0
        };

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let middle = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[middle - 1] + sorted[middle]) / 2.0
        } else {
            sorted[middle]
        };

        Self {
            mean,
            std_dev,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let summary = Summary::from_samples(&[4.0, 2.0, 8.0, 6.0]);
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 8.0);
        assert_eq!(summary.median, 5.0);
        // squares 1 + 9 + 9 + 1 = 20, / 3
        assert!((summary.std_dev - (20.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_single_and_empty_samples() {
        let one = Summary::from_samples(&[3.5]);
        assert_eq!(one.std_dev, 0.0);
        assert_eq!(one.median, 3.5);
        assert_eq!(Summary::from_samples(&[]), Summary::default());
    }
}
