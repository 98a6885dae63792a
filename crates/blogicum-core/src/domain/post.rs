use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AuthorRef, Category, Location, MAX_TITLE_LEN, UNSAVED_ID};
use crate::error::ValidationErrors;

/// Post entity - a publication by one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub text: String,
    /// Publication time; a future value schedules the post.
    pub pub_date: DateTime<Utc>,
    pub author_id: i32,
    /// `None` once the category has been deleted.
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    /// Path of the uploaded image, relative to the media root.
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// The author-editable part of a post.
///
/// There is deliberately no author here: the author always comes from the
/// authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub category_id: i32,
    pub location_id: Option<i32>,
    pub is_published: bool,
}

impl PostDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.title.trim().is_empty() {
            errors.add("title", "This field is required.");
        } else if self.title.chars().count() > MAX_TITLE_LEN {
            errors.add(
                "title",
                format!("Ensure this value has at most {MAX_TITLE_LEN} characters."),
            );
        }
        if self.text.trim().is_empty() {
            errors.add("text", "This field is required.");
        }

        errors.into_result(())
    }
}

impl Post {
    /// Create a new, unsaved post owned by `author_id`.
    pub fn new(author_id: i32, draft: PostDraft) -> Self {
        Self {
            id: UNSAVED_ID,
            title: draft.title,
            text: draft.text,
            pub_date: draft.pub_date,
            author_id,
            category_id: Some(draft.category_id),
            location_id: draft.location_id,
            image: None,
            is_published: draft.is_published,
            created_at: Utc::now(),
        }
    }

    /// Overwrite the editable fields, keeping id, author, image and creation time.
    pub fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.text = draft.text;
        self.pub_date = draft.pub_date;
        self.category_id = Some(draft.category_id);
        self.location_id = draft.location_id;
        self.is_published = draft.is_published;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub is_published: bool,
}

impl From<&Category> for CategoryRef {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            title: category.title.clone(),
            slug: category.slug.clone(),
            is_published: category.is_published,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub id: i32,
    pub name: String,
    pub is_published: bool,
}

impl From<&Location> for LocationRef {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id,
            name: location.name.clone(),
            is_published: location.is_published,
        }
    }
}

/// A post joined with everything a listing or detail page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetails {
    pub post: Post,
    pub author: AuthorRef,
    pub category: Option<CategoryRef>,
    pub location: Option<LocationRef>,
    pub comment_count: u64,
}

impl PostDetails {
    /// Whether the post's category exists and is published.
    pub fn category_published(&self) -> bool {
        self.category.as_ref().is_some_and(|c| c.is_published)
    }
}
