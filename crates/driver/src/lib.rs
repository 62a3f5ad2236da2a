//! Frame driver: owns the world and runs the per-frame loop.
//!
//! # Invariants
//! - Single-threaded; the world is only touched from `tick` and `apply`.
//! - The event log is drained every frame.
//! - In debug builds a broken world invariant is fatal.

mod config;
mod frame;
mod timer;

pub use config::{ConfigError, DriveConfig};
pub use frame::{FrameDriver, FrameStats};
pub use timer::DecorationTimer;

pub fn crate_info() -> &'static str {
    "roadstream-driver v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("driver"));
    }
}
