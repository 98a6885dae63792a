//! Publication visibility.
//!
//! A post is public when it is published, its category is published and its
//! publication time has passed. Authors always see their own posts.
//!
//! Listings describe what they want with a [`PostFilter`]; repositories turn
//! it into a query and must return rows ordered by `pub_date` descending, then
//! by id descending.

use chrono::{DateTime, Utc};

use crate::domain::{Post, PostDetails};

/// The public predicate for a single post.
pub fn is_publicly_visible(post: &Post, category_published: bool, now: DateTime<Utc>) -> bool {
    post.is_published && category_published && post.pub_date <= now
}

/// Public predicate with the author bypass applied.
pub fn can_view(details: &PostDetails, viewer_id: Option<i32>, now: DateTime<Utc>) -> bool {
    viewer_id == Some(details.post.author_id)
        || is_publicly_visible(&details.post, details.category_published(), now)
}

/// Which posts a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostFilter {
    /// Apply the public predicate as of this instant; `None` shows everything.
    pub visible_at: Option<DateTime<Utc>>,
    pub category_id: Option<i32>,
    pub author_id: Option<i32>,
}

impl PostFilter {
    /// Home page: every public post.
    pub fn public(now: DateTime<Utc>) -> Self {
        Self {
            visible_at: Some(now),
            category_id: None,
            author_id: None,
        }
    }

    /// Public posts of one category.
    pub fn in_category(category_id: i32, now: DateTime<Utc>) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::public(now)
        }
    }

    /// A profile listing; the owner also sees hidden and scheduled posts.
    pub fn by_author(author_id: i32, viewer_id: Option<i32>, now: DateTime<Utc>) -> Self {
        let visible_at = if viewer_id == Some(author_id) {
            None
        } else {
            Some(now)
        };
        Self {
            visible_at,
            category_id: None,
            author_id: Some(author_id),
        }
    }

    pub fn is_public(&self) -> bool {
        self.visible_at.is_some()
    }

    /// Evaluate the filter against one post.
    pub fn matches(&self, post: &Post, category_published: bool) -> bool {
        if let Some(now) = self.visible_at {
            if !is_publicly_visible(post, category_published, now) {
                return false;
            }
        }
        if let Some(category_id) = self.category_id {
            if post.category_id != Some(category_id) {
                return false;
            }
        }
        if let Some(author_id) = self.author_id {
            if post.author_id != author_id {
                return false;
            }
        }
        true
    }
}
