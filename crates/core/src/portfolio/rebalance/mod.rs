//! Rebalancing allocator.
//!
//! Two greedy allocators steer new cash toward an equal-weight target:
//! category-level gap allocation splits a budget across the four categories,
//! and instrument-level equalization splits an inflow across the instruments
//! of one category.

mod category_allocator;
mod instrument_equalizer;
mod rebalance_model;


pub use category_allocator::{allocate_by_category_gap, representative_holdings};
pub use instrument_equalizer::{equalize_inflow, plan_category_inflow};
pub use rebalance_model::*;
