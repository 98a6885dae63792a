//! Moderation CLI for Blogicum.
//!
//! Manages categories, locations and publish flags directly in the
//! database the web server uses.

mod commands;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use blogicum_infra::database::connect;
use blogicum_infra::{DatabaseConfig, Repositories};

#[derive(Parser, Debug)]
#[command(name = "blog-admin")]
#[command(about = "Blogicum moderation: categories, locations and publish flags")]
#[command(version)]
pub struct Cli {
    /// Database URL (defaults to DATABASE_URL)
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Manage locations
    #[command(subcommand)]
    Location(LocationCommand),
    /// Publish or hide posts
    #[command(subcommand)]
    Post(PostCommand),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CategoryCommand {
    Add(NewCategory),
    Publish { slug: String },
    Hide { slug: String },
    List,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct NewCategory {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub slug: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Create the category unpublished
    #[arg(long)]
    pub hidden: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum LocationCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        hidden: bool,
    },
    Publish { id: i32 },
    Hide { id: i32 },
    List,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum PostCommand {
    Publish { id: i32 },
    Hide { id: i32 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,blog_admin=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let db = connect(&DatabaseConfig::new(&cli.database_url))
        .await
        .context("Failed to connect to the database")?;
    let repos = Repositories::postgres(db);

    for line in commands::run(&repos, cli.command).await? {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["blog-admin", "--database-url", "postgres://localhost/blog"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn test_parse_category_add() {
        let command = parse(&["category", "add", "--title", "Travel", "--slug", "travel", "--hidden"]);
        assert_eq!(
            command,
            Command::Category(CategoryCommand::Add(NewCategory {
                title: "Travel".into(),
                slug: "travel".into(),
                description: String::new(),
                hidden: true,
            }))
        );
    }

    #[test]
    fn test_parse_flags_by_key() {
        assert_eq!(
            parse(&["category", "hide", "travel"]),
            Command::Category(CategoryCommand::Hide { slug: "travel".into() })
        );
        assert_eq!(
            parse(&["location", "publish", "3"]),
            Command::Location(LocationCommand::Publish { id: 3 })
        );
        assert_eq!(parse(&["post", "hide", "12"]), Command::Post(PostCommand::Hide { id: 12 }));
    }

    #[test]
    fn test_rejects_bad_input() {
        let base = ["blog-admin", "--database-url", "postgres://localhost/blog"];
        let missing_slug = [&base[..], &["category", "add", "--title", "Travel"]].concat();
        assert!(Cli::try_parse_from(missing_slug).is_err());

        let bad_id = [&base[..], &["post", "publish", "first"]].concat();
        assert!(Cli::try_parse_from(bad_id).is_err());
    }
}
