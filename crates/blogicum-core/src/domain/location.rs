use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MAX_TITLE_LEN, UNSAVED_ID};
use crate::error::ValidationErrors;

/// Location entity - an optional place attached to posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: i32,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn new(name: String) -> Self {
        Self {
            id: UNSAVED_ID,
            name,
            is_published: true,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "This field is required.");
        } else if self.name.chars().count() > MAX_TITLE_LEN {
            errors.add(
                "name",
                format!("Ensure this value has at most {MAX_TITLE_LEN} characters."),
            );
        }
        errors.into_result(())
    }
}
