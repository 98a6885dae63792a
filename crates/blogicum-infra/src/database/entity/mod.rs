//! SeaORM entities, one per table.

pub mod category;
pub mod comment;
pub mod location;
pub mod post;
pub mod user;

use sea_orm::{ActiveValue, NotSet, Set};

use blogicum_core::domain::UNSAVED_ID;

/// Primary key value for an active model: unsaved ids are left to the database.
pub(crate) fn primary_key(id: i32) -> ActiveValue<i32> {
    if id == UNSAVED_ID { NotSet } else { Set(id) }
}
