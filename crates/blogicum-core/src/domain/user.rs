use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UNSAVED_ID;
use crate::error::ValidationErrors;

const MAX_USERNAME_LEN: usize = 150;

/// Names that collide with fixed `/profile/...` routes.
const RESERVED_USERNAMES: &[&str] = &["edit"];

/// User entity - a registered author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Create a new, unsaved user.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: UNSAVED_ID,
            username,
            first_name: String::new(),
            last_name: String::new(),
            email,
            password_hash,
            date_joined: Utc::now(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id == UNSAVED_ID
    }

    /// "First Last", or the username when both names are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// Check username and email shape, recording problems into `errors`.
    pub fn check_identity(username: &str, email: &str, errors: &mut ValidationErrors) {
        if username.is_empty() {
            errors.add("username", "This field is required.");
        } else if username.chars().count() > MAX_USERNAME_LEN {
            errors.add(
                "username",
                format!("Ensure this value has at most {MAX_USERNAME_LEN} characters."),
            );
        } else if !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        } else if RESERVED_USERNAMES.contains(&username) {
            errors.add("username", "This username is not available.");
        }

        if !email.is_empty() && !looks_like_email(email) {
            errors.add("email", "Enter a valid email address.");
        }
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

/// The part of a user shown next to their content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: i32,
    pub username: String,
    pub display_name: String,
}

impl From<&User> for AuthorRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name(),
        }
    }
}
