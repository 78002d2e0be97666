pub mod allocation;
pub mod holdings;
pub mod rebalance;

pub use allocation::*;
pub use holdings::*;
pub use rebalance::*;
