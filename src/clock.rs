use chrono::{DateTime, Utc};

/// Source of the current instant used to compute relative dates
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the host's wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
