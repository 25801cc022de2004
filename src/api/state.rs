//! Application state for the hotel API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::context::{RequestContext, SharedClock};
use crate::services::face::SharedFaceRecognizer;
use crate::store::Store;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration, the store, the clock and the face recognizer.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Store,
    clock: SharedClock,
    face: SharedFaceRecognizer,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        config: ConfigLoader,
        store: Store,
        clock: SharedClock,
        face: SharedFaceRecognizer,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            clock,
            face,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns the face recognizer.
    pub fn face(&self) -> &SharedFaceRecognizer {
        &self.face
    }

    /// Builds the context for one request, reading the clock once.
    pub fn context(&self, actor_id: Option<Uuid>) -> RequestContext {
        RequestContext::new(actor_id, self.clock.now())
    }
}
