use chrono::{DateTime, TimeDelta, Utc};

use std::fmt;

/// Optimistic-lock token: a serial number plus the time the row was written.
///
/// Every successful save stamps a new token; the previous one guards the
/// `UPDATE`/`DELETE` so a stale copy cannot overwrite a newer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub serial: u64,
    pub time: DateTime<Utc>,
}

impl Version {
    pub fn new(serial: u64, time: DateTime<Utc>) -> Version {
        Version { serial, time }
    }

    /// Token for a freshly inserted row.
    pub fn initial() -> Version {
        Version::new(1, Utc::now())
    }

    /// Token following this one.
    pub fn next(&self) -> Version {
        Version::new(self.serial + 1, after(Some(self.time)))
    }

    /// Serial reset to zero with the current time, strictly later than
    /// `previous` so that consecutive tokens never compare equal.
    pub fn fresh(previous: Option<&Version>) -> Version {
        Version::new(0, after(previous.map(|version| version.time)))
    }
}

fn after(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(previous) if now <= previous => previous + TimeDelta::nanoseconds(1),
        _ => now,
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.serial, self.time.to_rfc3339())
    }
}
