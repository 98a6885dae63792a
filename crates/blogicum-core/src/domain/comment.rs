use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AuthorRef, UNSAVED_ID};
use crate::error::ValidationErrors;

/// Comment entity - a reply attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub post_id: i32,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: i32, author_id: i32, text: String) -> Self {
        Self {
            id: UNSAVED_ID,
            text,
            post_id,
            author_id,
            created_at: Utc::now(),
        }
    }

    pub fn validate_text(text: &str) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if text.trim().is_empty() {
            errors.add("text", "This field is required.");
        }
        errors.into_result(())
    }
}

/// A comment with its author, as shown under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDetails {
    pub comment: Comment,
    pub author: AuthorRef,
}
