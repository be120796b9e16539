//! Time source used for `created_at`/`updated_at` and for the "current"
//! month and year defaults. Timestamps are UTC instants; the calendar
//! defaults come from the user's local date.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Utc};

pub trait Clock: Send + Sync {
    /// The instant stamped on rows.
    fn now(&self) -> DateTime<Utc>;

    /// The calendar date as the user sees it, used for month/year defaults
    /// and the always-present current year.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time in the machine's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that only moves when told to. Whole seconds only, matching the
/// precision the store persists. Its local calendar sits at a fixed offset
/// from UTC, which is zero unless set with [`ManualClock::with_offset`].
#[derive(Debug)]
pub struct ManualClock {
    seconds: AtomicI64,
    offset: Option<FixedOffset>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            seconds: AtomicI64::new(start.timestamp()),
            offset: None,
        }
    }

    /// Place the local calendar at `offset` from UTC.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.seconds.store(at.timestamp(), Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.seconds.fetch_add(by.num_seconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let seconds = self.seconds.load(Ordering::SeqCst);
        DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }

    fn today(&self) -> NaiveDate {
        match self.offset {
            Some(offset) => self.now().with_timezone(&offset).date_naive(),
            None => self.now().date_naive(),
        }
    }
}
