//! `migration up|down|fresh|status ...` against `DATABASE_URL`.

use sea_orm_migration::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if std::env::var("DATABASE_URL").is_err() {
        tracing::warn!("DATABASE_URL is not set; pass -u/--database-url");
    }

    cli::run_cli(migration::Migrator).await;
}
