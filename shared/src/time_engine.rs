//! Time Engine - Zone resolution and anchor-based hour conversion
//!
//! Every hour shown by the zone slider is derived from a single UTC anchor
//! instant. This module resolves zone identifiers, builds the anchor, and
//! projects it into each zone.

use chrono::{DateTime, Duration, NaiveDate, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Identifier that gets the fixed +05:30 rule on slider changes
pub const KOLKATA: &str = "Asia/Kolkata";

/// Minutes added by the fixed India rule
const KOLKATA_OFFSET_MINUTES: i64 = 5 * 60 + 30;

/// Error type for zone lookups
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ZoneError {
    /// The identifier is not a known IANA time zone
    #[error("Invalid timezone: {0}")]
    Unknown(String),
}

/// How a zone identifier maps an anchor instant to a local hour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneRule {
    /// Hand-rolled +05:30 offset, no zone database lookup
    FixedIndia,
    /// A zone from the IANA database
    Named(Tz),
    /// Free-text label with no matching zone; treated as UTC
    Unresolved,
}

impl ZoneRule {
    /// Rule applied when a slider moves.
    ///
    /// `Asia/Kolkata` is special-cased to the fixed offset; everything else
    /// goes through the zone database.
    pub fn for_slider(zone: &str) -> Self {
        if zone == KOLKATA {
            return ZoneRule::FixedIndia;
        }
        Self::general(zone)
    }

    /// Rule applied for display labels
    pub fn general(zone: &str) -> Self {
        match parse_timezone(zone) {
            Ok(tz) => ZoneRule::Named(tz),
            Err(_) => ZoneRule::Unresolved,
        }
    }

    /// Local hour-of-day (0-23) of `anchor` under this rule
    pub fn local_hour(&self, anchor: DateTime<Utc>) -> u32 {
        match self {
            ZoneRule::FixedIndia => (anchor + Duration::minutes(KOLKATA_OFFSET_MINUTES)).hour(),
            ZoneRule::Named(tz) => anchor.with_timezone(tz).hour(),
            ZoneRule::Unresolved => anchor.hour(),
        }
    }

    /// Whether the identifier was found (or special-cased)
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ZoneRule::Unresolved)
    }
}

/// Build the anchor instant: `now` with its hour replaced by `hour`.
///
/// The UTC date and the minute/second of `now` are kept. Hours above 23 are
/// clamped.
pub fn anchor_instant(now: DateTime<Utc>, hour: u32) -> DateTime<Utc> {
    now.with_hour(hour.min(23)).unwrap_or(now)
}

/// "HH:MM" of the anchor in UTC
pub fn utc_label(anchor: DateTime<Utc>) -> String {
    anchor.format("%H:%M").to_string()
}

/// "HH:MM" of the anchor converted into `zone`
pub fn format_zone_label(anchor: DateTime<Utc>, zone: &str) -> String {
    match ZoneRule::general(zone) {
        ZoneRule::Named(tz) => anchor.with_timezone(&tz).format("%H:%M").to_string(),
        _ => utc_label(anchor),
    }
}

/// UTC offset of `zone` at `anchor`, in minutes (e.g. 330 for Kolkata)
pub fn utc_offset_minutes(zone: &str, anchor: DateTime<Utc>) -> i32 {
    match ZoneRule::general(zone) {
        ZoneRule::Named(tz) => anchor.with_timezone(&tz).offset().fix().local_minus_utc() / 60,
        _ => 0,
    }
}

/// Format an offset in minutes as "UTC±hh:mm"
pub fn format_utc_offset(offset_minutes: i32) -> String {
    let sign = if offset_minutes >= 0 { "+" } else { "-" };
    let abs_minutes = offset_minutes.abs();
    format!("UTC{}{:02}:{:02}", sign, abs_minutes / 60, abs_minutes % 60)
}

/// Parse a timezone string into a Tz
pub fn parse_timezone(tz_str: &str) -> Result<Tz, ZoneError> {
    tz_str
        .parse::<Tz>()
        .map_err(|_| ZoneError::Unknown(tz_str.to_string()))
}

/// Search timezones by name (case-insensitive partial match)
pub fn search_timezones(query: &str) -> Vec<Tz> {
    let query_lower = query.to_lowercase();
    chrono_tz::TZ_VARIANTS
        .iter()
        .filter(|tz| tz.name().to_lowercase().contains(&query_lower))
        .copied()
        .collect()
}

/// Calendar date of `selected` on a wall clock in `zone`
pub fn local_date<Z: TimeZone>(selected: DateTime<Utc>, zone: &Z) -> NaiveDate {
    selected.with_timezone(zone).date_naive()
}

/// Replace the calendar date of `selected` as seen in `zone`, keeping the
/// wall-clock time there.
///
/// A wall time that falls in a DST gap moves forward by an hour; an ambiguous
/// one takes the earlier instant.
pub fn with_local_date<Z: TimeZone>(
    selected: DateTime<Utc>,
    date: NaiveDate,
    zone: &Z,
) -> DateTime<Utc> {
    let wall = date.and_time(selected.with_timezone(zone).time());
    zone.from_local_datetime(&wall)
        .earliest()
        .or_else(|| zone.from_local_datetime(&(wall + Duration::hours(1))).earliest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or(selected)
}

/// Move a date by `days`, saturating at the calendar bounds
pub fn shift_date(date: NaiveDate, days: i64) -> NaiveDate {
    let delta = Duration::days(days);
    date.checked_add_signed(delta).unwrap_or(date)
}

/// Build a date from loosely edited parts.
///
/// Month is clamped to 1-12 and the day to the last day of that month, so a
/// stepper that lands on Feb 31 yields Feb 28/29.
pub fn clamp_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let month = month.clamp(1, 12);
    let mut day = day.clamp(1, 31);
    loop {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
        if day <= 28 {
            return None;
        }
        day -= 1;
    }
}
