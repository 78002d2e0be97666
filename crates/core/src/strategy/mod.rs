//! Strategy decision builder: weekly deployment sessions built from the
//! category gap allocator, edited by the user, and confirmed into the ledger.

mod strategy_model;
mod strategy_planner;
mod strategy_service;
mod strategy_session;


pub use strategy_model::*;
pub use strategy_planner::{timing_signal, StrategyPlanner};
pub use strategy_service::{StrategyService, StrategyServiceTrait};
