pub mod transactions_model;
pub mod transactions_service;
pub mod transactions_traits;

#[cfg(test)]
mod transactions_model_tests;
#[cfg(test)]
mod transactions_service_tests;

pub use transactions_model::*;
pub use transactions_service::LedgerService;
pub use transactions_traits::LedgerServiceTrait;
