use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Pseudo instrument code used for the cash category
pub use fundpilot_market_data::CASH_INSTRUMENT_CODE;

/// Decimal precision for cash amounts (allocations, recorded amounts)
pub const AMOUNT_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for settlement units
pub const UNITS_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for percentages shown in summaries
pub const PERCENT_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for intermediate valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Positions at or below this many units are treated as liquidated
pub const LIQUIDATION_EPSILON: Decimal = dec!(0.0001);

/// Timing gap at or below which a deployment is a strong buy signal (-1.5%)
pub const STRONG_SIGNAL_THRESHOLD: Decimal = dec!(-0.015);

/// Default budget for a weekly deployment plan
pub const DEFAULT_BUDGET: Decimal = dec!(200);

/// Budget suggested when the timing signal is strong
pub const BOOSTED_BUDGET: Decimal = dec!(300);

/// Number of categories in the equal-weight target
pub const CATEGORY_COUNT: usize = 4;

/// Keyed store entries
pub mod store_keys {
    /// Transaction ledger (array of transactions)
    pub const TRANSACTIONS: &str = "fund_transactions";

    /// Price history cache (map of instrument code to price series)
    pub const PRICE_HISTORY: &str = "fund_nav_cache";

    /// Strategy preferences
    pub const PREFERENCES: &str = "strategy_preferences";
}
