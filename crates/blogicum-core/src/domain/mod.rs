//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod page;
mod post;
mod user;

pub use category::Category;
pub use comment::{Comment, CommentDetails};
pub use location::Location;
pub use page::{Page, PageRequest};
pub use post::{CategoryRef, LocationRef, Post, PostDetails, PostDraft};
pub use user::{AuthorRef, User};

/// Id carried by entities that have not been stored yet.
///
/// The store assigns the real key on first save.
pub const UNSAVED_ID: i32 = 0;

/// Longest title, name or category label accepted.
pub const MAX_TITLE_LEN: usize = 256;
