pub mod analytics;
pub mod catalog;
pub mod db;
pub mod errors;
pub mod logging;
pub mod models;
pub mod store;
pub mod tracker;
pub mod transfer;

#[cfg(feature = "desktop")]
mod desktop;

#[cfg(feature = "desktop")]
pub use desktop::run;

pub use errors::{AppError, AppResult};
pub use store::{MeasurementStore, MemoryStorage, StorageBackend};
pub use tracker::TrackerCore;
