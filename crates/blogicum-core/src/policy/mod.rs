//! Who may see and who may change content.

pub mod ownership;
pub mod visibility;

pub use ownership::{Access, Authored, check_author};
pub use visibility::{PostFilter, can_view, is_publicly_visible};
