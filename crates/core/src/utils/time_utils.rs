use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;

/// Default timezone for trading dates.
/// Fund NAVs are published per mainland-China trading day.
pub const DEFAULT_MARKET_TZ: Tz = chrono_tz::Asia::Shanghai;

/// Converts a UTC instant to a trading date in the given timezone.
///
/// Use this whenever a "business date" has to be derived from a timestamp.
pub fn market_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's trading date in the given timezone.
pub fn market_date_today(tz: Tz) -> NaiveDate {
    market_date_from_utc(Utc::now(), tz)
}

/// Monday of the week containing `date` (weeks start on Monday).
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}
