use anyhow::{Context, Result, anyhow, bail};

use blogicum_core::domain::{Category, Location};
use blogicum_infra::Repositories;

use crate::{CategoryCommand, Command, LocationCommand, NewCategory, PostCommand};

/// Execute one command; returns the lines to print.
pub async fn run(repos: &Repositories, command: Command) -> Result<Vec<String>> {
    match command {
        Command::Category(cmd) => category(repos, cmd).await,
        Command::Location(cmd) => location(repos, cmd).await,
        Command::Post(cmd) => post(repos, cmd).await,
    }
}

fn flag(published: bool) -> &'static str {
    if published { "published" } else { "hidden" }
}

async fn category(repos: &Repositories, command: CategoryCommand) -> Result<Vec<String>> {
    match command {
        CategoryCommand::Add(NewCategory {
            title,
            slug,
            description,
            hidden,
        }) => {
            let mut category = Category::new(title, description, slug);
            category.is_published = !hidden;
            category
                .validate()
                .map_err(|errors| anyhow!("Invalid category: {errors}"))?;

            let saved = repos
                .categories
                .save(category)
                .await
                .context("Could not save category")?;
            tracing::info!(id = saved.id, slug = %saved.slug, "Category created");
            Ok(vec![format!("Created category {} ({})", saved.slug, flag(saved.is_published))])
        }
        CategoryCommand::Publish { slug } => set_category_flag(repos, &slug, true).await,
        CategoryCommand::Hide { slug } => set_category_flag(repos, &slug, false).await,
        CategoryCommand::List => {
            let categories = repos.categories.list_all().await?;
            Ok(categories
                .iter()
                .map(|c| format!("{:<24} {:<10} {}", c.slug, flag(c.is_published), c.title))
                .collect())
        }
    }
}

async fn set_category_flag(repos: &Repositories, slug: &str, published: bool) -> Result<Vec<String>> {
    let Some(mut category) = repos.categories.find_by_slug(slug).await? else {
        bail!("No category with slug {slug}");
    };
    category.is_published = published;
    repos.categories.save(category).await?;
    tracing::info!(slug, published, "Category flag changed");
    Ok(vec![format!("Category {slug} is now {}", flag(published))])
}

async fn location(repos: &Repositories, command: LocationCommand) -> Result<Vec<String>> {
    let (id, published) = match command {
        LocationCommand::Add { name, hidden } => {
            let mut location = Location::new(name);
            location.is_published = !hidden;
            location
                .validate()
                .map_err(|errors| anyhow!("Invalid location: {errors}"))?;

            let saved = repos
                .locations
                .save(location)
                .await
                .context("Could not save location")?;
            tracing::info!(id = saved.id, "Location created");
            return Ok(vec![format!(
                "Created location {} \"{}\" ({})",
                saved.id,
                saved.name,
                flag(saved.is_published)
            )]);
        }
        LocationCommand::List => {
            let locations = repos.locations.list_all().await?;
            return Ok(locations
                .iter()
                .map(|l| format!("{:<6} {:<10} {}", l.id, flag(l.is_published), l.name))
                .collect());
        }
        LocationCommand::Publish { id } => (id, true),
        LocationCommand::Hide { id } => (id, false),
    };

    let Some(mut location) = repos.locations.find_by_id(id).await? else {
        bail!("No location with id {id}");
    };
    location.is_published = published;
    repos.locations.save(location).await?;
    tracing::info!(id, published, "Location flag changed");
    Ok(vec![format!("Location {id} is now {}", flag(published))])
}

async fn post(repos: &Repositories, command: PostCommand) -> Result<Vec<String>> {
    let (id, published) = match command {
        PostCommand::Publish { id } => (id, true),
        PostCommand::Hide { id } => (id, false),
    };

    let Some(mut post) = repos.posts.find_by_id(id).await? else {
        bail!("No post with id {id}");
    };
    post.is_published = published;
    repos.posts.save(post).await?;
    tracing::info!(id, published, "Post flag changed");
    Ok(vec![format!("Post {id} is now {}", flag(published))])
}
