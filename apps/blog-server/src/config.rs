//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use blogicum_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub templates_dir: String,
    pub site: SiteSettings,
}

/// Settings handlers read at request time.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub posts_per_page: u64,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: bool,
    /// Uploaded images live under `<media_root>/post_images`.
    pub media_root: PathBuf,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            posts_per_page: 10,
            cookie_secure: false,
            media_root: PathBuf::from("./media"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_var("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_var("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        let defaults = SiteSettings::default();
        let site = SiteSettings {
            posts_per_page: parse_var("POSTS_PER_PAGE")
                .filter(|n: &u64| *n > 0)
                .unwrap_or(defaults.posts_per_page),
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.cookie_secure),
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.media_root),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            templates_dir: env::var("TEMPLATES_DIR")
                .unwrap_or_else(|_| default_templates_dir().to_string()),
            site,
        }
    }
}

/// Templates shipped with the crate.
pub fn default_templates_dir() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/templates")
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}
