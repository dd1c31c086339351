#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    /// Four decimals
    #[default]
    #[value(name = "float")]
    Float,
    /// Scientific notation, four decimals
    #[value(name = "sci")]
    Sci,
    /// Shortest representation that round-trips
    #[value(name = "full")]
    Full,
}

impl Format {
    pub fn format(&self, value: f64) -> String {
        match self {
            Format::Float => format!("{:.4}", value),
            Format::Sci => format!("{:.4e}", value),
            Format::Full => format!("{}", value),
        }
    }
}

/// Format a duration in seconds as a human-readable string
pub fn format_duration(secs: f64) -> String {
    if !secs.is_finite() {
        format!("{}", secs)
    } else if secs < 1e-3 {
        format!("{:.2}µs", secs * 1e6)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1e3)
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        format!("{}m{:.2}s", mins as i64, secs - mins * 60.0)
    } else {
        let hours = (secs / 3600.0).floor();
        let mins = ((secs - hours * 3600.0) / 60.0).floor();
        let rest = secs - hours * 3600.0 - mins * 60.0;
        format!("{}h{}m{:.2}s", hours as i64, mins as i64, rest)
    }
}
