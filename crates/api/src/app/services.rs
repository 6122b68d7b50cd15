use std::sync::Arc;

use medstock_infra::{
    ConfigError, DocumentStore, HttpBackend, Settings, StoreError, TeamDirectory,
};

/// Everything a handler needs: settings plus the backend ports.
///
/// The backend is absent when the store connection settings are incomplete;
/// handlers then answer with the configuration error instead of calling out.
pub struct AppServices {
    settings: Settings,
    documents: Option<Arc<dyn DocumentStore>>,
    teams: Option<Arc<dyn TeamDirectory>>,
}

impl AppServices {
    /// Wire the HTTP backend from settings.
    pub fn from_settings(settings: Settings) -> Result<Self, StoreError> {
        match settings.store() {
            Ok(store) => {
                let backend = Arc::new(HttpBackend::new(&store)?);
                Ok(Self {
                    settings,
                    documents: Some(backend.clone()),
                    teams: Some(backend),
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "backend not configured; functions will fail until it is");
                Ok(Self {
                    settings,
                    documents: None,
                    teams: None,
                })
            }
        }
    }

    /// Wire an explicit backend (tests/dev).
    pub fn with_backend<B>(settings: Settings, backend: Arc<B>) -> Self
    where
        B: DocumentStore + TeamDirectory + 'static,
    {
        Self {
            settings,
            documents: Some(backend.clone()),
            teams: Some(backend),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn documents(&self) -> Result<&dyn DocumentStore, ConfigError> {
        match &self.documents {
            Some(d) => Ok(d.as_ref()),
            None => Err(self.missing_backend()),
        }
    }

    pub fn teams(&self) -> Result<&dyn TeamDirectory, ConfigError> {
        match &self.teams {
            Some(t) => Ok(t.as_ref()),
            None => Err(self.missing_backend()),
        }
    }

    fn missing_backend(&self) -> ConfigError {
        match self.settings.store() {
            Err(e) => e,
            Ok(_) => ConfigError::Invalid("backend not wired".to_string()),
        }
    }
}
