//! Category valuation: per-category values, percentages and weekly gains.

mod allocation_model;
mod allocation_service;


pub use allocation_model::*;
pub use allocation_service::*;
