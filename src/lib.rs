//! Visitor intake server
//!
//! Accepts overnight visitor registrations from resident students, records
//! the visit with a fixed 24 hour stay, and stores the visitor's photo and ID
//! scan in object storage.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod storage;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
