//! Core entities shared across the tracker.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::errors::ValidationError;

/// Required length of a rendezvous identifier, in characters.
pub const IDENTIFIER_LEN: usize = 128;

/// Instance name used when a publisher does not name one.
pub const DEFAULT_INSTANCE: &str = "default";

/// Opaque lookup key peers share out-of-band to find each other.
///
/// Identifiers are never parsed or interpreted; the only rule is the exact
/// length. They are not secrets (anyone holding one may query it), but peers
/// keep them private among trusted correspondents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Validate and wrap a raw identifier string.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.len() != IDENTIFIER_LEN {
            return Err(ValidationError::IdentifierLength {
                expected: IDENTIFIER_LEN,
                actual: raw.len(),
            });
        }
        Ok(Self(raw))
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which of the two address tables a row lives in.
///
/// Primary addresses are a peer's best-known reachable endpoints; alternate
/// addresses are supplementary candidates (NAT-traversal guesses) tracked
/// identically but queried separately and excluded from usage stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Space {
    Primary,
    Alternate,
}

impl Space {
    /// Select the space from a request's alternate flag.
    pub fn from_alternate_flag(alternate: bool) -> Self {
        if alternate {
            Space::Alternate
        } else {
            Space::Primary
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Space::Primary => write!(f, "primary"),
            Space::Alternate => write!(f, "alternate"),
        }
    }
}

/// A stored (instance, address) row as returned by lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAddress {
    /// Publishing peer's instance name.
    pub instance: String,
    /// Reachable endpoint, `host:port`.
    pub address: String,
    /// When the row was last published or refreshed.
    pub last_seen: DateTime<Utc>,
}

/// Distinct-count summary for one calendar day of the stats log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyUsage {
    /// The calendar day (UTC).
    pub day: NaiveDate,
    /// Distinct addresses with at least one event that day.
    pub addresses: u64,
    /// Distinct identifiers with at least one event that day.
    pub identifiers: u64,
}
