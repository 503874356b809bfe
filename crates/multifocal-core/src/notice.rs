//! Short-lived presentational flags.
//!
//! A flag is a deadline evaluated on read. Raising it again restarts the
//! delay; nothing is ever cancelled and nothing here touches history or form
//! data.

use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset, Local};

/// How long the submit control stays highlighted after a calculation.
pub const SUBMIT_HIGHLIGHT: Duration = Duration::from_secs(2);
/// How long a success message stays visible.
pub const MESSAGE_TTL: Duration = Duration::from_secs(3);
/// How long the "copied" indicator stays visible after an export.
pub const COPIED_TTL: Duration = Duration::from_secs(2);

/// One reading of both clocks. The wall time stamps records; the monotonic
/// instant drives flag deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub wall: DateTime<FixedOffset>,
    pub instant: Instant,
}

impl Moment {
    pub fn new(wall: DateTime<FixedOffset>, instant: Instant) -> Self {
        Self { wall, instant }
    }

    pub fn now() -> Self {
        Self::new(Local::now().into(), Instant::now())
    }

    /// The same wall time, `elapsed` later on the monotonic clock.
    pub fn after(self, elapsed: Duration) -> Self {
        Self::new(self.wall, self.instant + elapsed)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransientFlag {
    until: Option<Instant>,
}

impl TransientFlag {
    pub fn raise(&mut self, now: Instant, ttl: Duration) {
        self.until = Some(now + ttl);
    }

    pub fn is_raised(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }
}

/// A message that hides itself after a fixed delay.
#[derive(Debug, Clone, Default)]
pub struct Notice {
    message: String,
    flag: TransientFlag,
}

impl Notice {
    pub fn show(&mut self, message: impl Into<String>, now: Instant, ttl: Duration) {
        self.message = message.into();
        self.flag.raise(now, ttl);
    }

    /// The message, while it is still visible.
    pub fn current(&self, now: Instant) -> Option<&str> {
        self.flag.is_raised(now).then_some(self.message.as_str())
    }
}
