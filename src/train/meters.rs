//! Running averages and wall-clock timing

use std::time::Instant;

/// Tracks the latest value and the count-weighted running average
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AverageMeter {
    pub val: f64,
    pub avg: f64,
    pub sum: f64,
    pub count: u64,
}

impl AverageMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record `val` observed `n` times (e.g. a batch mean over `n` samples)
    pub fn update(&mut self, val: f64, n: u64) {
        self.val = val;
        self.sum += val * n as f64;
        self.count += n;
        if self.count > 0 {
            self.avg = self.sum / self.count as f64;
        }
    }
}

/// Incremental weighted mean without storing a sum
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Averager {
    n: f64,
    v: f64,
}

impl Averager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in `v` with weight `n`
    pub fn add(&mut self, v: f64, n: f64) {
        let total = self.n + n;
        if total == 0.0 {
            return;
        }
        self.v = (self.v * self.n + v * n) / total;
        self.n = total;
    }

    /// Current mean (0 before anything was added)
    pub fn item(&self) -> f64 {
        self.v
    }

    /// Accumulated weight
    pub fn weight(&self) -> f64 {
        self.n
    }
}

/// Wall-clock stopwatch
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Start a timer now
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Restart from now
    pub fn start(&mut self) {
        self.start = Instant::now();
    }

    /// Seconds since the last (re)start
    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Format a duration in seconds as `1.5h`, `2.0m` or `3.0s`
pub fn time_str(seconds: f64) -> String {
    if seconds >= 3600.0 {
        format!("{:.1}h", seconds / 3600.0)
    } else if seconds >= 60.0 {
        format!("{:.1}m", seconds / 60.0)
    } else {
        format!("{:.1}s", seconds)
    }
}
