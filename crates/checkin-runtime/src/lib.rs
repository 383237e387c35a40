//! Runtime layer for the check-in monitor: the owned dataset store and the
//! dashboard service facade built on top of it.

pub mod service;
pub mod store;

pub use service::DashboardService;
pub use store::{DatasetStore, StoreMode};
