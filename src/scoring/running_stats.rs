// Streaming mean and variance (Welford's algorithm).
//
// Each bootstrap run accumulates one RunningStats per term. The accumulator
// is plain mutable state: give every worker its own and never share one
// across threads.

/// Single-pass mean / sample variance over a stream of f64 values.
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    n: u64,
    mean: f64,
    /// Sum of squared deviations from the running mean
    m2: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the empty state. All fields are cleared, not just the count.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn push(&mut self, x: f64) {
        self.n += 1;
        if self.n == 1 {
            self.mean = x;
            self.m2 = 0.0;
        } else {
            let old_mean = self.mean;
            self.mean = old_mean + (x - old_mean) / self.n as f64;
            self.m2 += (x - old_mean) * (x - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.n
    }

    /// Running mean, or 0.0 before any value is pushed.
    pub fn mean(&self) -> f64 {
        if self.n > 0 {
            self.mean
        } else {
            0.0
        }
    }

    /// Sample variance (n - 1 denominator); 0.0 with fewer than two values.
    pub fn variance(&self) -> f64 {
        if self.n > 1 {
            self.m2 / (self.n - 1) as f64
        } else {
            0.0
        }
    }

    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }
}

impl Extend<f64> for RunningStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.push(x);
        }
    }
}
