//! Shared application state.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::generators::ItaxCredentialsGenerator;

/// Read-only state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ItaxCredentialsGenerator>,
}

impl AppState {
    pub fn new(generator: ItaxCredentialsGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.build_generator())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ItaxCredentialsGenerator::new())
    }
}
