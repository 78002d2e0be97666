//! Date-based price lookups over a single instrument's series.
//!
//! All functions expect a series sorted ascending by date, as produced by
//! `fundpilot_market_data::normalize_series`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fundpilot_market_data::PricePoint;

use crate::utils::time_utils::monday_of_week;

/// How a T-day lookup found its point.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TDayMatch {
    /// The close of the trading day before settlement.
    Preceding,
    /// Settlement precedes or equals the first cached point.
    FirstAvailable,
    /// Settlement is past the cached window; latest point used.
    Stale,
}

/// Result of a T-day lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TDayPrice {
    pub date: NaiveDate,
    pub nav: Decimal,
    pub matched: TDayMatch,
}

/// Resolves the settlement price for a transaction dated `settlement_date`.
///
/// Orders settle at the previous trading day's close: the first point dated
/// on or after the settlement date is located and the point before it is
/// used. Returns `None` only for an empty series.
pub fn resolve_t_day_price(series: &[PricePoint], settlement_date: NaiveDate) -> Option<TDayPrice> {
    let last = series.last()?;
    let idx = series.partition_point(|p| p.date < settlement_date);

    let (point, matched) = if idx == series.len() {
        (last, TDayMatch::Stale)
    } else if idx == 0 {
        (&series[0], TDayMatch::FirstAvailable)
    } else {
        (&series[idx - 1], TDayMatch::Preceding)
    };

    Some(TDayPrice {
        date: point.date,
        nav: point.nav,
        matched,
    })
}

/// Most recent cached point.
pub fn latest_point(series: &[PricePoint]) -> Option<&PricePoint> {
    series.last()
}

/// Reference price for the week containing `today`.
///
/// The latest point dated before this week's Monday; the earliest point
/// when the series starts within the current week.
pub fn monday_baseline(series: &[PricePoint], today: NaiveDate) -> Option<Decimal> {
    let monday = monday_of_week(today);
    let idx = series.partition_point(|p| p.date < monday);
    if idx > 0 {
        Some(series[idx - 1].nav)
    } else {
        series.first().map(|p| p.nav)
    }
}
