use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Code of the cash pseudo-instrument. It has no price history and is always
/// valued at par.
pub const CASH_INSTRUMENT_CODE: &str = "CASH";

/// One net-asset-value sample of a fund.
///
/// Providers publish epoch timestamps; those are normalized to the trading
/// date in the market's local timezone so that every comparison downstream is
/// a plain calendar-date comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Trading date of the close
    pub date: NaiveDate,

    /// Net asset value per unit at that close
    pub nav: Decimal,
}

impl PricePoint {
    pub fn new(date: NaiveDate, nav: Decimal) -> Self {
        Self { date, nav }
    }

    /// Builds a point from an epoch-millisecond timestamp, bucketing it into
    /// the trading date of `tz`. Returns `None` for out-of-range timestamps.
    pub fn from_epoch_millis(millis: i64, nav: Decimal, tz: Tz) -> Option<Self> {
        let instant = DateTime::from_timestamp_millis(millis)?;
        Some(Self {
            date: instant.with_timezone(&tz).date_naive(),
            nav,
        })
    }
}

/// Sorts a series by date and keeps only the last sample for any repeated date.
pub fn normalize_series(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    points.sort_by_key(|p| p.date);
    let mut normalized: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        match normalized.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => normalized.push(point),
        }
    }
    normalized
}
