//! Smart Warehouse server
//!
//! REST JSON API for tracking equipment: registry, issue/return workflow with
//! an append-only operation ledger, inventory reconciliation and staff
//! notifications.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
