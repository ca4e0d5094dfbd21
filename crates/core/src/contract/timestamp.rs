//! Nanosecond-precision timestamp type
//!
//! ## Precision
//!
//! Wire timestamps carry up to nine fractional digits. A `Timestamp` stores
//! whole seconds since the Unix epoch plus a nanosecond offset, so a value read
//! from the wire is written back with exactly the digits it arrived with.
//! Converting through a millisecond instant would drop them.
//!
//! Instants outside years 0001 through 9999 have no RFC 3339 form. They are
//! written as `<secs>.<nanos>` since the epoch (`-99999999999.000000000`),
//! which [`FromStr`] also accepts.
//!
//! ## Usage
//!
//! ```
//! use faunadb_core::Timestamp;
//!
//! let ts: Timestamp = "2015-01-15T13:56:51.123456789Z".parse().unwrap();
//! assert_eq!(ts.subsec_nanos(), 123_456_789);
//! assert_eq!(ts.to_string(), "2015-01-15T13:56:51.123456789Z");
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;

const NANOS_PER_SEC: i64 = 1_000_000_000;

// 0001-01-01T00:00:00Z through 9999-12-31T23:59:59Z
const RFC3339_SECS: std::ops::RangeInclusive<i64> = -62_135_596_800..=253_402_300_799;

/// Instant with nanosecond precision
///
/// ## Invariants
///
/// - `subsec_nanos()` is always below one second
/// - Ordering follows the instant (seconds first, then nanos)
/// - Instants before the epoch have negative seconds and a positive nano offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    secs: i64,
    nanos: u32,
}

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp { secs: 0, nanos: 0 };

    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a timestamp for the current moment
    pub fn now() -> Self {
        Timestamp::from_datetime(Utc::now())
    }

    /// Create from seconds and a nanosecond offset
    ///
    /// Offsets of one second or more carry into the seconds.
    pub const fn from_secs_nanos(secs: i64, nanos: u32) -> Self {
        Timestamp {
            secs: secs + (nanos / NANOS_PER_SEC as u32) as i64,
            nanos: nanos % NANOS_PER_SEC as u32,
        }
    }

    /// Create from whole seconds since epoch
    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        Timestamp { secs, nanos: 0 }
    }

    /// Create from milliseconds since epoch
    pub const fn from_millis(millis: i64) -> Self {
        Timestamp::from_nanos_i128(millis as i128 * 1_000_000)
    }

    /// Create from microseconds since epoch
    pub const fn from_micros(micros: i64) -> Self {
        Timestamp::from_nanos_i128(micros as i128 * 1_000)
    }

    const fn from_nanos_i128(nanos: i128) -> Self {
        Timestamp {
            secs: nanos.div_euclid(NANOS_PER_SEC as i128) as i64,
            nanos: nanos.rem_euclid(NANOS_PER_SEC as i128) as u32,
        }
    }

    /// Create from a chrono UTC instant
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        // Leap seconds surface as nanos >= 1e9; from_secs_nanos carries them.
        Timestamp::from_secs_nanos(dt.timestamp(), dt.timestamp_subsec_nanos())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Whole seconds since Unix epoch
    #[inline]
    pub const fn secs(&self) -> i64 {
        self.secs
    }

    /// Nanosecond offset within the second
    #[inline]
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Milliseconds since Unix epoch (floors)
    pub const fn as_millis(&self) -> i64 {
        self.secs * 1_000 + (self.nanos / 1_000_000) as i64
    }

    /// Microseconds since Unix epoch (floors)
    pub const fn as_micros(&self) -> i64 {
        self.secs * 1_000_000 + (self.nanos / 1_000) as i64
    }

    /// Nanoseconds since Unix epoch
    pub const fn as_nanos(&self) -> i128 {
        self.secs as i128 * NANOS_PER_SEC as i128 + self.nanos as i128
    }

    /// Convert to a chrono UTC instant
    ///
    /// Returns `None` when the instant is outside chrono's supported range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.secs, self.nanos)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::EPOCH
    }
}

impl fmt::Display for Timestamp {
    /// RFC 3339 in UTC with as many fractional digits as needed (0, 3, 6 or 9)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rfc3339 = self
            .to_datetime()
            .filter(|_| RFC3339_SECS.contains(&self.secs));
        match rfc3339 {
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => write!(f, "{}.{:09}", self.secs, self.nanos),
        }
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    /// Parse an RFC 3339 instant; offsets are normalized to UTC
    ///
    /// The `<secs>.<nanos>` form written for far instants is accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match DateTime::parse_from_rfc3339(s) {
            Ok(parsed) => Ok(Timestamp::from_datetime(parsed.with_timezone(&Utc))),
            Err(e) => parse_epoch_form(s).ok_or(e),
        }
    }
}

fn parse_epoch_form(s: &str) -> Option<Timestamp> {
    let (secs, nanos) = s.split_once('.')?;
    if nanos.len() != 9 || !nanos.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(Timestamp::from_secs_nanos(secs.parse().ok()?, nanos.parse().ok()?))
}

// ============================================================================
// From Implementations
// ============================================================================

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::from_datetime(dt)
    }
}

// ============================================================================
// Tests
// ============================================================================
