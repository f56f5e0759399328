pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
pub mod sheet;

pub use crate::config::AppConfig;
pub use db::create_pool;
pub use error::{AppError, AppResult};
pub use service::{PartResolver, StockImportService};
