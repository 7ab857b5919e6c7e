//! Session-fixed timestamps for consistent pagination.
//!
//! The backend evaluates "now or later" filters and excludes items created
//! after the snapshot, so every page of one scroll session must carry the same
//! value. A new value is taken only when a feed is reset.

use std::fmt;
use std::sync::Mutex;

use chrono::{Duration, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// ISO-local timestamp without a UTC offset, e.g. `2026-10-19T20:15:00`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotTime(String);

impl SnapshotTime {
    pub fn from_naive(time: NaiveDateTime) -> Self {
        Self(time.format(SNAPSHOT_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait SnapshotClock: Send + Sync {
    fn now(&self) -> SnapshotTime;
}

/// Wall clock rendered in a fixed reference timezone.
#[derive(Debug, Clone, Copy)]
pub struct ZonedClock {
    tz: Tz,
}

impl ZonedClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Default for ZonedClock {
    fn default() -> Self {
        Self::new(chrono_tz::Europe::Berlin)
    }
}

impl SnapshotClock for ZonedClock {
    fn now(&self) -> SnapshotTime {
        SnapshotTime::from_naive(Utc::now().with_timezone(&self.tz).naive_local())
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, time: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = time;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl SnapshotClock for ManualClock {
    fn now(&self) -> SnapshotTime {
        SnapshotTime::from_naive(*self.now.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(20, 15, 0)
            .unwrap()
    }

    #[test]
    fn test_format_has_no_offset() {
        let snapshot = SnapshotTime::from_naive(start());
        assert_eq!(snapshot.as_str(), "2026-10-19T20:15:00");
    }

    #[test]
    fn test_manual_clock_is_stable_until_advanced() {
        let clock = ManualClock::new(start());
        assert_eq!(clock.now(), clock.now());

        clock.advance(Duration::seconds(1));
        assert_eq!(clock.now().as_str(), "2026-10-19T20:15:01");
    }

    #[test]
    fn test_zoned_clock_parses_back() {
        let clock = ZonedClock::default();
        let snapshot = clock.now();
        assert!(NaiveDateTime::parse_from_str(snapshot.as_str(), SNAPSHOT_FORMAT).is_ok());
        assert!(!snapshot.as_str().ends_with('Z'));
    }
}
