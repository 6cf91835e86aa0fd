//! Folio client
//!
//! Typed, observable data stores for the books and authors collections of a
//! library catalog REST API.

use std::sync::Arc;

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod signal;

pub use config::AppConfig;
pub use error::{AppError, AppResult, FetchError};
pub use services::{EntityStore, FetchStatus, StoreRegistry};

/// Application state handed to every consumer of the stores
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub stores: Arc<StoreRegistry>,
}

impl AppState {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let stores = StoreRegistry::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            stores: Arc::new(stores),
        })
    }
}
