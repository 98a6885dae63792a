//! # Blogicum Core
//!
//! The domain layer of Blogicum.
//! This crate contains the data model, the publication visibility rules and the
//! ownership checks, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;

pub use error::DomainError;
