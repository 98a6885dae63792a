//! Submitted form payloads.
//!
//! Every form carries `csrf_token`; a missing token deserializes to an empty
//! string so the request fails the CSRF check instead of form parsing.
//! None of the content forms has an author field: the author is always the
//! signed-in user.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use blogicum_core::domain::{Comment, Post, PostDraft, User};
use blogicum_core::error::ValidationErrors;

pub const MIN_PASSWORD_LEN: usize = 8;

const DATETIME_LOCAL: &str = "%Y-%m-%dT%H:%M";

/// Format for `<input type="datetime-local">`.
pub fn format_datetime_local(value: DateTime<Utc>) -> String {
    value.format(DATETIME_LOCAL).to_string()
}

/// Parse a `datetime-local` value (taken as UTC) or an RFC 3339 timestamp.
pub fn parse_datetime_local(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    [DATETIME_LOCAL, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn parse_id(value: &str) -> Option<i32> {
    value.trim().parse().ok().filter(|id| *id > 0)
}

/// Raw post form fields, as typed by the author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFields {
    pub title: String,
    pub text: String,
    pub pub_date: String,
    pub category: String,
    pub location: String,
    pub is_published: bool,
}

impl PostFields {
    /// An empty form: published, dated now.
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            pub_date: format_datetime_local(now),
            is_published: true,
            ..Self::default()
        }
    }

    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: format_datetime_local(post.pub_date),
            category: post.category_id.map(|id| id.to_string()).unwrap_or_default(),
            location: post.location_id.map(|id| id.to_string()).unwrap_or_default(),
            is_published: post.is_published,
        }
    }

    /// Parse and validate. Whether the category and location exist is left
    /// to the caller.
    pub fn to_draft(&self) -> Result<PostDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let pub_date = parse_datetime_local(&self.pub_date);
        if pub_date.is_none() {
            errors.add("pub_date", "Enter a valid date/time.");
        }

        let category_id = parse_id(&self.category);
        if category_id.is_none() {
            errors.add("category", "This field is required.");
        }

        let location_id = if self.location.trim().is_empty() {
            None
        } else {
            let id = parse_id(&self.location);
            if id.is_none() {
                errors.add("location", "Select a valid choice.");
            }
            id
        };

        let (Some(pub_date), Some(category_id)) = (pub_date, category_id) else {
            return Err(errors);
        };

        let draft = PostDraft {
            title: self.title.trim().to_string(),
            text: self.text.clone(),
            pub_date,
            category_id,
            location_id,
            is_published: self.is_published,
        };
        if let Err(more) = draft.validate() {
            errors.merge(more);
        }

        errors.into_result(draft)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            csrf_token: String::new(),
            text: comment.text.clone(),
        }
    }

    pub fn validate(&self) -> Result<String, ValidationErrors> {
        Comment::validate_text(&self.text)?;
        Ok(self.text.trim().to_string())
    }
}

/// Delete confirmation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password1: String,
    #[serde(default, skip_serializing)]
    pub password2: String,
}

impl RegistrationForm {
    /// Shape checks only; username availability needs the repository.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        User::check_identity(self.username.trim(), self.email.trim(), &mut errors);

        if self.password1.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password1",
                format!("This password is too short. It must contain at least {MIN_PASSWORD_LEN} characters."),
            );
        } else if self.password1.chars().all(|c| c.is_ascii_digit()) {
            errors.add("password1", "This password is entirely numeric.");
        }
        if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors.into_result(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            csrf_token: String::new(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        User::check_identity(self.username.trim(), self.email.trim(), &mut errors);
        for (field, value) in [("first_name", &self.first_name), ("last_name", &self.last_name)] {
            if value.chars().count() > 150 {
                errors.add(field, "Ensure this value has at most 150 characters.");
            }
        }
        errors.into_result(())
    }

    /// Copy the edited fields onto `user`.
    pub fn apply(&self, user: &mut User) {
        user.username = self.username.trim().to_string();
        user.first_name = self.first_name.trim().to_string();
        user.last_name = self.last_name.trim().to_string();
        user.email = self.email.trim().to_string();
    }
}
