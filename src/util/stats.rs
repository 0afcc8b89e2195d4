use std::fmt::Display;

/// Running minimum, maximum and mean of a series of samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl Stats {
    pub fn add_sample(&mut self, value: f64) {
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.avg += (value - self.avg) / (self.count as f64);
    }
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            avg: 0.0,
        }
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            return write!(f, "no samples");
        }
        write!(
            f,
            "{} - {}; avg {:.2}; {} samples",
            self.min, self.max, self.avg, self.count
        )
    }
}
