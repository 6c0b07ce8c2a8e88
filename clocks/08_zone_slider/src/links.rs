//! Links module - meeting URLs built from the session

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use url::Url;

const CALENDAR_EVENT_URL: &str = "https://calendar.google.com/calendar/u/0/r/eventedit";

/// Error type for link construction
#[derive(Debug, Error)]
pub enum LinkError {
    /// The configured origin is not a URL
    #[error("invalid share origin: {0}")]
    InvalidOrigin(#[from] url::ParseError),
    /// The origin parses but cannot carry a path (e.g. `mailto:`)
    #[error("share origin cannot have a path: {0}")]
    NotABase(String),
}

/// Calendar timestamp form, `YYYYMMDDTHHMMSSZ`
pub fn calendar_stamp(selected: DateTime<Utc>) -> String {
    selected.format("%Y%m%dT%H%M%SZ").to_string()
}

/// URL that opens a new calendar event with a Meet link on the selected date
pub fn schedule_meet_url(selected: DateTime<Utc>) -> String {
    let stamp = calendar_stamp(selected);
    format!(
        "{}?vcon=meet&dates={}/{}&hl=en&pli=1",
        CALENDAR_EVENT_URL, stamp, stamp
    )
}

/// `<origin>/meeting?date=<ISO-8601>&timezones=<zone,zone,...>`
///
/// Zones keep their current order. Characters that are not allowed in a query
/// (spaces in free-text labels) are percent-encoded; commas and slashes are not.
pub fn shareable_link<'a>(
    origin: &str,
    selected: DateTime<Utc>,
    zones: impl IntoIterator<Item = &'a str>,
) -> Result<Url, LinkError> {
    let mut url = Url::parse(origin)?;
    if url.cannot_be_a_base() {
        return Err(LinkError::NotABase(origin.to_string()));
    }

    let date = selected.to_rfc3339_opts(SecondsFormat::Millis, true);
    let zones = zones.into_iter().collect::<Vec<_>>().join(",");
    url.set_path("/meeting");
    url.set_query(Some(&format!("date={}&timezones={}", date, zones)));
    Ok(url)
}

/// Hand a URL to the system browser
pub fn open_in_browser(url: &str) {
    tracing::info!(%url, "opening browser");
    if let Err(e) = open::that(url) {
        tracing::warn!("Failed to open browser: {}", e);
    }
}
