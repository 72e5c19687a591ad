//! Shared application state for the audit API.

use std::sync::Arc;

use crate::api::auth::ClaimsVerifier;
use crate::config::ScoringConfig;
use crate::datastore::Datastore;
use crate::engine::AuditEngine;

/// Shared application state.
///
/// Everything handlers need: the run orchestrator, the datastore for
/// pack assembly, the token verifier and the scoring configuration.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<AuditEngine>,
    store: Arc<dyn Datastore>,
    verifier: Arc<dyn ClaimsVerifier>,
    config: Arc<ScoringConfig>,
}

impl AppState {
    /// Creates the application state from its collaborators.
    pub fn new(
        engine: Arc<AuditEngine>,
        store: Arc<dyn Datastore>,
        verifier: Arc<dyn ClaimsVerifier>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            engine,
            store,
            verifier,
            config: Arc::new(config),
        }
    }

    /// The run orchestrator.
    pub fn engine(&self) -> &AuditEngine {
        &self.engine
    }

    /// The datastore.
    pub fn store(&self) -> &dyn Datastore {
        self.store.as_ref()
    }

    /// The token verifier.
    pub fn verifier(&self) -> &dyn ClaimsVerifier {
        self.verifier.as_ref()
    }

    /// The scoring configuration.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
