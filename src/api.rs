//! HTTP API for the specialist chat service

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::catalog::Catalog;
use crate::exchange::ExchangeController;
use crate::preferences::{PreferenceStore, Preferences};
use crate::store::{KeyValueStore, SqliteStore};
use crate::transport::LoggingTransport;
use std::sync::{Arc, PoisonError, RwLock};

pub type ProductionController = ExchangeController<SqliteStore, LoggingTransport>;

/// Durable preferences behind whichever store backs them
pub type SharedPreferenceStore = PreferenceStore<Arc<dyn KeyValueStore>>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub controller: Arc<ProductionController>,
    pub preference_store: Arc<SharedPreferenceStore>,
    preferences: Arc<RwLock<Preferences>>,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        controller: ProductionController,
        preference_store: SharedPreferenceStore,
        preferences: Preferences,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            controller: Arc::new(controller),
            preference_store: Arc::new(preference_store),
            preferences: Arc::new(RwLock::new(preferences)),
        }
    }

    /// Snapshot of the current preferences
    pub fn preferences(&self) -> Preferences {
        *self
            .preferences
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_preferences(&self, preferences: Preferences) {
        *self
            .preferences
            .write()
            .unwrap_or_else(PoisonError::into_inner) = preferences;
    }
}
