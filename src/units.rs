/// Unit of the time column. Times are converted to seconds on ingest, so rates
/// come out per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TimeUnit {
    #[value(name = "ms")]
    Milliseconds,
    #[default]
    #[value(name = "s")]
    Seconds,
    #[value(name = "min")]
    Minutes,
    #[value(name = "h")]
    Hours,
}

impl TimeUnit {
    /// Get the scale factor to convert from this unit to seconds
    pub fn scale(&self) -> f64 {
        match self {
            Self::Milliseconds => 1e-3,
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3600.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_unit_scales() {
        assert_eq!(TimeUnit::Milliseconds.scale(), 1e-3);
        assert_eq!(TimeUnit::Seconds.scale(), 1.0);
        assert_eq!(TimeUnit::Minutes.scale(), 60.0);
        assert_eq!(TimeUnit::Hours.scale(), 3600.0);
    }

    #[test]
    fn test_default_is_seconds() {
        assert_eq!(TimeUnit::default(), TimeUnit::Seconds);
    }

    #[test]
    fn test_conversion_examples() {
        // 90 minutes = 5400 seconds
        assert_eq!(90.0 * TimeUnit::Minutes.scale(), 5400.0);

        // A rate of -0.6 per minute is -0.01 per second
        assert!((-0.6 / TimeUnit::Minutes.scale() - -0.01).abs() < 1e-15);
    }
}
