use std::time::SystemTime;

/// Source of wall-clock time for the playhead.
///
/// This is wall-clock time, not monotonic time: backwards adjustments of the
/// system clock are visible to callers.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Reads the operating system's real-time clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
