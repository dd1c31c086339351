/// Pre-computed statistics over a sorted set of rates.
/// Data is kept sorted to enable quantile lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct RateStats {
    pub data: Vec<f64>,
    pub n: usize,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl RateStats {
    /// Returns `None` for an empty set, where none of these are defined.
    pub fn new(mut data: Vec<f64>) -> Option<Self> {
        if data.is_empty() {
            return None;
        }

        // Sum in input order so the mean does not depend on the sort.
        let n = data.len();
        let sum: f64 = data.iter().sum();
        let mean = sum / n as f64;
        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        data.sort_by(f64::total_cmp);

        Some(RateStats {
            min: data[0],
            max: data[n - 1],
            data,
            n,
            sum,
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Calculate quantile (0.0 = min, 0.5 = median, 1.0 = max)
    pub fn quantile(&self, q: f64) -> f64 {
        if q <= 0.0 {
            return self.min;
        }
        if q >= 1.0 {
            return self.max;
        }

        // Linear interpolation between closest ranks
        let rank = q * (self.n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = rank.ceil() as usize;
        let fraction = rank - lower as f64;

        self.data[lower] * (1.0 - fraction) + self.data[upper] * fraction
    }

    /// Middle value, or the mean of the two middle values for an even count.
    pub fn median(&self) -> f64 {
        let mid = self.n / 2;
        if self.n % 2 == 1 {
            self.data[mid]
        } else {
            (self.data[mid - 1] + self.data[mid]) / 2.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_basic() {
        let stats = RateStats::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        assert_eq!(stats.n, 5);
        assert_eq!(stats.sum, 15.0);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
    }

    #[test]
    fn test_stats_empty() {
        assert!(RateStats::new(Vec::new()).is_none());
    }

    #[test]
    fn test_stats_sorted() {
        let stats = RateStats::new(vec![5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
        assert_eq!(stats.data, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_stats_std_dev() {
        // Population variance of [2, 4, 6, 8, 10] is 8
        let stats = RateStats::new(vec![2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
        assert!((stats.std_dev - 8.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_median_odd() {
        let stats = RateStats::new(vec![-0.3, -0.1, -0.2]).unwrap();
        assert_eq!(stats.median(), -0.2);
    }

    #[test]
    fn test_median_even() {
        let stats = RateStats::new(vec![4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.median(), 2.5);
        assert_eq!(stats.quantile(0.5), 2.5);
    }

    #[test]
    fn test_median_matches_quantile() {
        let stats = RateStats::new(vec![0.7, -1.2, 3.3, 0.1, 9.0, -4.5, 2.2]).unwrap();
        assert!((stats.median() - stats.quantile(0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_bounds() {
        let stats = RateStats::new(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        assert_eq!(stats.quantile(-0.5), 1.0);
        assert_eq!(stats.quantile(0.0), 1.0);
        assert_eq!(stats.quantile(1.0), 5.0);
        assert_eq!(stats.quantile(1.5), 5.0);
        assert!((stats.quantile(0.25) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_single_value() {
        let stats = RateStats::new(vec![-0.5]).unwrap();

        assert_eq!(stats.median(), -0.5);
        assert_eq!(stats.quantile(0.5), -0.5);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_nan_does_not_panic_sort() {
        let stats = RateStats::new(vec![1.0, f64::NAN, 0.5]).unwrap();
        assert_eq!(stats.n, 3);
        assert_eq!(stats.data[0], 0.5);
    }
}
