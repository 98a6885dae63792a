//! # Blogicum Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::HttpServer;
use anyhow::Context;

use blog_server::build_app;
use blog_server::config::AppConfig;
use blog_server::render::Templates;
use blog_server::state::AppState;
use blog_server::telemetry::{LogFormat, init_telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(LogFormat::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting Blogicum on {}:{}", config.host, config.port);

    let templates = Templates::load(&config.templates_dir)
        .with_context(|| format!("loading templates from {}", config.templates_dir))?;

    let state = AppState::new(&config, templates).await;

    HttpServer::new(move || build_app(state.clone()))
        .bind((config.host.as_str(), config.port))
        .with_context(|| format!("binding {}:{}", config.host, config.port))?
        .run()
        .await?;

    Ok(())
}
