use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MAX_TITLE_LEN, UNSAVED_ID};
use crate::error::ValidationErrors;

const MAX_SLUG_LEN: usize = 64;

/// Category entity - a named grouping of posts with its own publish flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new, unsaved and published category.
    pub fn new(title: String, description: String, slug: String) -> Self {
        Self {
            id: UNSAVED_ID,
            title,
            description,
            slug,
            is_published: true,
            created_at: Utc::now(),
        }
    }

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

        if !is_valid_slug(&self.slug) {
            errors.add(
                "slug",
                "Identifier may contain only latin letters, digits, hyphens and underscores.",
            );
        }

        errors.into_result(())
    }
}

/// Latin letters, digits, `-` and `_`; 1 to 64 characters.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_rules() {
        assert!(is_valid_slug("travel_2024-notes"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("путешествия"));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug(&"x".repeat(65)));
    }

    #[test]
    fn test_validate_category() {
        let category = Category::new("Travel".into(), "Trips".into(), "travel".into());
        assert!(category.validate().is_ok());
        assert!(category.is_published);

        let bad = Category::new(" ".into(), String::new(), "bad slug".into());
        let errors = bad.validate().unwrap_err();
        assert!(errors.has("title"));
        assert!(errors.has("slug"));
    }
}
