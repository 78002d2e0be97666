//! Copy-on-write price history cache.

use std::sync::{Arc, PoisonError, RwLock};

use fundpilot_market_data::{normalize_series, PricePoint};

use super::PriceHistory;

/// Holds the current price history behind an `Arc`.
///
/// Readers take a [`snapshot`](Self::snapshot) that never changes underneath
/// them. Writers replace one instrument's series at a time; a snapshot taken
/// before the write keeps seeing the old map.
#[derive(Debug, Default)]
pub struct PriceHistoryStore {
    current: RwLock<Arc<PriceHistory>>,
}

impl PriceHistoryStore {
    pub fn new(initial: PriceHistory) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    pub fn snapshot(&self) -> Arc<PriceHistory> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Atomically swaps in a new series for `code`, sorted by date with
    /// repeated dates collapsed.
    pub fn replace_series(&self, code: &str, series: Vec<PricePoint>) {
        let series = normalize_series(series);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        Arc::make_mut(&mut guard).insert(code.to_string(), series);
    }

    /// Replaces the whole cache (used when loading from the store). Every
    /// series is normalized like [`replace_series`](Self::replace_series).
    pub fn replace_all(&self, history: PriceHistory) {
        let history: PriceHistory = history
            .into_iter()
            .map(|(code, series)| (code, normalize_series(series)))
            .collect();
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(history);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let store = PriceHistoryStore::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        store.replace_series("A", vec![PricePoint::new(date, dec!(1))]);

        let before = store.snapshot();
        store.replace_series("B", vec![PricePoint::new(date, dec!(2))]);
        store.replace_series("A", vec![PricePoint::new(date, dec!(3))]);

        assert_eq!(before.len(), 1);
        assert_eq!(before["A"][0].nav, dec!(1));

        let after = store.snapshot();
        assert_eq!(after.len(), 2);
        assert_eq!(after["A"][0].nav, dec!(3));
    }

    #[test]
    fn test_series_are_sorted_and_deduplicated_on_write() {
        let store = PriceHistoryStore::default();
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        store.replace_series(
            "A",
            vec![
                PricePoint::new(d(6), dec!(1.3)),
                PricePoint::new(d(4), dec!(1.1)),
                PricePoint::new(d(6), dec!(1.4)),
            ],
        );

        let dates: Vec<NaiveDate> = store.snapshot()["A"].iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(4), d(6)]);
        assert_eq!(store.snapshot()["A"][1].nav, dec!(1.4));

        let mut history = PriceHistory::new();
        history.insert(
            "B".to_string(),
            vec![PricePoint::new(d(8), dec!(2)), PricePoint::new(d(5), dec!(1))],
        );
        store.replace_all(history);

        let loaded = store.snapshot();
        assert_eq!(loaded["B"][0].date, d(5));
        assert_eq!(loaded["B"][1].date, d(8));
        assert!(!loaded.contains_key("A"));
    }
}
