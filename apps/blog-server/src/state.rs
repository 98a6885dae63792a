//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::ports::{PasswordService, TokenService};
use blogicum_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService, Repositories};

use crate::config::{AppConfig, SiteSettings};
use crate::render::Templates;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub templates: Arc<Templates>,
    pub settings: Arc<SiteSettings>,
    /// `"postgres"` or `"memory"`, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store when
    /// no database is configured or reachable.
    pub async fn new(config: &AppConfig, templates: Templates) -> Self {
        let (repos, storage) = Self::repositories(config).await;

        tracing::info!(storage, "Application state initialized");

        Self::from_parts(
            repos,
            storage,
            Arc::new(JwtTokenService::from_env()),
            templates,
            config.site.clone(),
        )
    }

    pub fn from_parts(
        repos: Repositories,
        storage: &'static str,
        tokens: Arc<dyn TokenService>,
        templates: Templates,
        settings: SiteSettings,
    ) -> Self {
        Self {
            repos,
            tokens,
            passwords: Arc::new(Argon2PasswordService::new()),
            templates: Arc::new(templates),
            settings: Arc::new(settings),
            storage,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> (Repositories, &'static str) {
        if let Some(db_config) = &config.database {
            match blogicum_infra::database::connect(db_config).await {
                Ok(db) => return (Repositories::postgres(db), "postgres"),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }
        (Self::in_memory(), "memory")
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> (Repositories, &'static str) {
        tracing::info!("Running without postgres feature - using in-memory repository");
        (Self::in_memory(), "memory")
    }

    fn in_memory() -> Repositories {
        Repositories::in_memory(Arc::new(InMemoryStore::new()))
    }
}
