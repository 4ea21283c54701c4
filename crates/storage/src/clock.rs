//! Time source and timestamp formats used by the store.

use std::cell::Cell;

use time::{Duration, OffsetDateTime, UtcOffset};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

/// Wall-clock UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock that starts at a fixed instant and advances by `step` on every
/// reading. Gives reproducible timestamps and ids.
#[derive(Debug)]
pub struct SteppingClock {
    next: Cell<OffsetDateTime>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: OffsetDateTime, step: Duration) -> Self {
        SteppingClock {
            next: Cell::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> OffsetDateTime {
        let current = self.next.get();
        self.next.set(current + self.step);
        current
    }
}

/// `YYYY-MM-DDTHH:MM:SS.ffffffZ`, always 27 characters, so string order is
/// time order.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let at = at.to_offset(UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:06}Z",
        at.year(),
        at.month() as u8,
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
        at.microsecond()
    )
}

/// `YYYYmmddHHMMSS`, the timestamp part of record ids.
pub fn id_stamp(at: OffsetDateTime) -> String {
    let at = at.to_offset(UtcOffset::UTC);
    format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        at.year(),
        at.month() as u8,
        at.day(),
        at.hour(),
        at.minute(),
        at.second()
    )
}
