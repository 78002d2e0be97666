pub mod backup_model;
pub mod backup_service;
pub mod backup_traits;


pub use backup_model::*;
pub use backup_service::{BackupService, BackupServiceTrait};
pub use backup_traits::BackupTransportTrait;
