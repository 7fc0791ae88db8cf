pub mod businesses;
pub mod events;
pub mod location;
pub mod movies;
pub mod weather;

pub use businesses::BusinessService;
pub use events::EventService;
pub use location::LocationService;
pub use movies::MovieService;
pub use weather::WeatherService;

use crate::clients::ProviderError;
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("location not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

fn day_string(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Render a Unix timestamp as the stored day string, e.g. 1609459200 ->
/// "Fri Jan 01 2021". This is the 15-character day prefix of the classic
/// `Date#toString()` rendering (weekday, month, day, year), evaluated in
/// UTC so stored values are reproducible across hosts.
pub(crate) fn format_unix_day(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| day_string(dt.date_naive()))
        .unwrap_or_default()
}

/// Same day rendering for provider date strings, accepting both
/// "2021-06-05T19:30:00" and bare "2021-06-05" forms.
pub(crate) fn format_date_day(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map(day_string)
        .unwrap_or_default()
}
