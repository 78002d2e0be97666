pub mod preferences_model;
pub mod preferences_service;

pub use preferences_model::*;
pub use preferences_service::{PreferencesService, PreferencesServiceTrait};
