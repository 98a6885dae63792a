use async_trait::async_trait;

use crate::domain::{
    Category, Comment, CommentDetails, Location, Page, PageRequest, Post, PostDetails, User,
};
use crate::error::RepoError;
use crate::policy::PostFilter;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity. Unsaved entities are inserted and get their id assigned.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Dependent rows follow the schema's
    /// cascade rules.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, i32> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// Every category, ordered by title.
    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;
}

#[async_trait]
pub trait LocationRepository: BaseRepository<Location, i32> {
    /// Every location, ordered by name.
    async fn list_all(&self) -> Result<Vec<Location>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// A post with author, category, location and comment count, unfiltered.
    async fn find_details(&self, id: i32) -> Result<Option<PostDetails>, RepoError>;

    /// Posts matching `filter`, newest `pub_date` first, annotated like
    /// [`find_details`](Self::find_details). Out-of-range pages are clamped.
    async fn list(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostDetails>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i32> {
    /// Comments of a post with their authors, oldest first.
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<CommentDetails>, RepoError>;

    /// A comment, only if it belongs to `post_id`.
    async fn find_for_post(
        &self,
        post_id: i32,
        comment_id: i32,
    ) -> Result<Option<Comment>, RepoError>;
}
