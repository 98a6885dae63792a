//! # Blogicum Shared
//!
//! Form payloads and paging helpers used by the web server and the admin CLI.

pub mod forms;
pub mod paging;

pub use paging::PageQuery;
