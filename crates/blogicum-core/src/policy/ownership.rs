//! Ownership checks for mutating content.

use crate::domain::{Comment, Post};

/// Content that has exactly one author.
pub trait Authored {
    fn author_id(&self) -> i32;
}

impl Authored for Post {
    fn author_id(&self) -> i32 {
        self.author_id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> i32 {
        self.author_id
    }
}

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

/// Only the author may edit or delete.
pub fn check_author<T: Authored + ?Sized>(entity: &T, user_id: i32) -> Access {
    if entity.author_id() == user_id {
        Access::Granted
    } else {
        Access::Denied
    }
}
