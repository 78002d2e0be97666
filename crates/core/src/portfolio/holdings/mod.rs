pub mod holdings_calculator;
pub mod holdings_model;
pub mod holdings_service;


pub use holdings_calculator::HoldingsCalculator;
pub use holdings_model::*;
pub use holdings_service::{HoldingsService, HoldingsServiceTrait};
