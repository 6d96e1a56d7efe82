//! Outbound ports the host application provides implementations for.
//!
//! The report sink port lives in [`crate::stats::report`] next to its
//! payload type.

use chrono::{DateTime, Utc};

/// Clock abstraction so expiry and calendar-day logic are testable.
///
/// Implementations must be `Send + Sync`; the tracker reads the clock once
/// per request and threads the value through each component.
pub trait TimeSource: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Production time source backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
