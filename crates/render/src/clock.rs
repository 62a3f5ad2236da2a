use std::time::Instant;

/// Source of elapsed time for animation.
pub trait Clock {
    /// Seconds since the clock started.
    fn elapsed_secs(&self) -> f64;
}

/// Wall clock started at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Clock advanced by hand. Drives headless runs at a fixed frame rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    secs: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, secs: f64) {
        self.secs += secs;
    }

    pub fn set(&mut self, secs: f64) {
        self.secs = secs;
    }
}

impl Clock for ManualClock {
    fn elapsed_secs(&self) -> f64 {
        self.secs
    }
}
