//! Wall-clock sources.

use chrono::{Local, NaiveTime};

/// Supplies the local time of day for each frame.
pub trait Clock {
    fn now(&self) -> NaiveTime;
}

/// The system's local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// A clock frozen at one instant, for tests and screenshots.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}
