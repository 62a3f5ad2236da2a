/// Periodic trigger measured against the elapsed time since start.
///
/// Fires at most once per poll. If several intervals passed between two
/// polls the missed ones are skipped, not queued.
#[derive(Debug, Clone)]
pub struct DecorationTimer {
    interval_ms: u64,
    next_ms: u64,
    fired: u64,
}

impl DecorationTimer {
    /// A timer whose first firing is one `interval_ms` after start.
    pub fn new(interval_ms: u64) -> Self {
        let interval_ms = interval_ms.max(1);
        Self {
            interval_ms,
            next_ms: interval_ms,
            fired: 0,
        }
    }

    /// True if an interval boundary was crossed since the last firing.
    pub fn poll(&mut self, elapsed_secs: f64) -> bool {
        let now = (elapsed_secs * 1000.0) as u64;
        if now < self.next_ms {
            return false;
        }
        let missed = (now - self.next_ms) / self.interval_ms;
        self.next_ms += (missed + 1) * self.interval_ms;
        self.fired += 1;
        true
    }

    /// Number of times the timer has fired.
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_interval() {
        let mut timer = DecorationTimer::new(5000);
        let fired: Vec<u32> = (0..=60 * 16)
            .filter(|frame| timer.poll(f64::from(*frame) / 60.0))
            .map(|frame| frame as u32)
            .collect();
        assert_eq!(fired, vec![300, 600, 900]);
        assert_eq!(timer.fired(), 3);
    }

    #[test]
    fn nothing_before_first_interval() {
        let mut timer = DecorationTimer::new(5000);
        assert!(!timer.poll(0.0));
        assert!(!timer.poll(4.999));
        assert!(timer.poll(5.0));
        assert!(!timer.poll(5.0));
    }

    #[test]
    fn long_stall_fires_once() {
        let mut timer = DecorationTimer::new(5000);
        assert!(timer.poll(23.0));
        assert!(!timer.poll(24.9));
        assert!(timer.poll(25.0));
    }
}
