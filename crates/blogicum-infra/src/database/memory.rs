//! In-memory store - used when no database is configured, and in tests.
//!
//! Mirrors the relational schema: unique usernames and slugs, cascading
//! deletes from users and posts, and SET NULL from categories and locations.
//! Data is lost on process restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blogicum_core::domain::{
    AuthorRef, Category, CategoryRef, Comment, CommentDetails, Location, LocationRef, Page,
    PageRequest, Post, PostDetails, UNSAVED_ID, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::policy::PostFilter;
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};

pub struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

#[derive(Default)]
pub struct Tables {
    users: Table<User>,
    categories: Table<Category>,
    locations: Table<Location>,
    posts: Table<Post>,
    comments: Table<Comment>,
}

impl Tables {
    fn category_published(&self, post: &Post) -> bool {
        post.category_id
            .and_then(|id| self.categories.rows.get(&id))
            .is_some_and(|c| c.is_published)
    }

    fn details(&self, post: &Post) -> Option<PostDetails> {
        let author = self.users.rows.get(&post.author_id)?;
        Some(PostDetails {
            post: post.clone(),
            author: AuthorRef::from(author),
            category: post
                .category_id
                .and_then(|id| self.categories.rows.get(&id))
                .map(CategoryRef::from),
            location: post
                .location_id
                .and_then(|id| self.locations.rows.get(&id))
                .map(LocationRef::from),
            comment_count: self
                .comments
                .rows
                .values()
                .filter(|c| c.post_id == post.id)
                .count() as u64,
        })
    }

    fn delete_post_cascade(&mut self, post_id: i32) {
        self.comments.rows.retain(|_, c| c.post_id != post_id);
    }
}

/// A stored entity type: where it lives and which schema rules apply to it.
pub trait Row: Clone + Send + Sync + 'static {
    fn id(&self) -> i32;
    fn set_id(&mut self, id: i32);
    fn table(tables: &Tables) -> &Table<Self>;
    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Unique and foreign key checks before a write.
    fn check_constraints(&self, _tables: &Tables) -> Result<(), RepoError> {
        Ok(())
    }

    /// Fix up dependent rows after this row was removed.
    fn on_delete(_id: i32, _tables: &mut Tables) {}
}

impl Row for User {
    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.users
    }
    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.users
    }

    fn check_constraints(&self, tables: &Tables) -> Result<(), RepoError> {
        let taken = tables
            .users
            .rows
            .values()
            .any(|u| u.id != self.id && u.username == self.username);
        if taken {
            return Err(RepoError::Constraint(format!(
                "duplicate username: {}",
                self.username
            )));
        }
        Ok(())
    }

    fn on_delete(id: i32, tables: &mut Tables) {
        let owned: Vec<i32> = tables
            .posts
            .rows
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.posts.rows.remove(&post_id);
            tables.delete_post_cascade(post_id);
        }
        tables.comments.rows.retain(|_, c| c.author_id != id);
    }
}

impl Row for Category {
    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.categories
    }
    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.categories
    }

    fn check_constraints(&self, tables: &Tables) -> Result<(), RepoError> {
        let taken = tables
            .categories
            .rows
            .values()
            .any(|c| c.id != self.id && c.slug == self.slug);
        if taken {
            return Err(RepoError::Constraint(format!(
                "duplicate slug: {}",
                self.slug
            )));
        }
        Ok(())
    }

    fn on_delete(id: i32, tables: &mut Tables) {
        for post in tables.posts.rows.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
    }
}

impl Row for Location {
    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.locations
    }
    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.locations
    }

    fn on_delete(id: i32, tables: &mut Tables) {
        for post in tables.posts.rows.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
    }
}

impl Row for Post {
    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.posts
    }
    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.posts
    }

    fn check_constraints(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.users.rows.contains_key(&self.author_id) {
            return Err(RepoError::Constraint("post author does not exist".into()));
        }
        if let Some(id) = self.category_id {
            if !tables.categories.rows.contains_key(&id) {
                return Err(RepoError::Constraint("post category does not exist".into()));
            }
        }
        if let Some(id) = self.location_id {
            if !tables.locations.rows.contains_key(&id) {
                return Err(RepoError::Constraint("post location does not exist".into()));
            }
        }
        Ok(())
    }

    fn on_delete(id: i32, tables: &mut Tables) {
        tables.delete_post_cascade(id);
    }
}

impl Row for Comment {
    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.comments
    }
    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.comments
    }

    fn check_constraints(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.posts.rows.contains_key(&self.post_id) {
            return Err(RepoError::Constraint("comment post does not exist".into()));
        }
        if !tables.users.rows.contains_key(&self.author_id) {
            return Err(RepoError::Constraint("comment author does not exist".into()));
        }
        Ok(())
    }
}

/// All repositories backed by one set of in-process tables.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<T: Row> BaseRepository<T, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<T>, RepoError> {
        let tables = self.tables.read().await;
        Ok(T::table(&tables).rows.get(&id).cloned())
    }

    async fn save(&self, mut entity: T) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;
        entity.check_constraints(&tables)?;

        let table = T::table_mut(&mut tables);
        if entity.id() == UNSAVED_ID {
            table.last_id += 1;
            entity.set_id(table.last_id);
        } else if !table.rows.contains_key(&entity.id()) {
            return Err(RepoError::NotFound);
        }

        table.rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if T::table_mut(&mut tables).rows.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        T::on_delete(id, &mut tables);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .rows
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .rows
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.rows.values().cloned().collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Location>, RepoError> {
        let tables = self.tables.read().await;
        let mut locations: Vec<Location> = tables.locations.rows.values().cloned().collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_details(&self, id: i32) -> Result<Option<PostDetails>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.rows.get(&id).and_then(|p| tables.details(p)))
    }

    async fn list(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostDetails>, RepoError> {
        let tables = self.tables.read().await;

        let mut matching: Vec<&Post> = tables
            .posts
            .rows
            .values()
            .filter(|p| filter.matches(p, tables.category_published(p)))
            .collect();
        matching.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let page = page.clamp(total);
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .filter_map(|p| tables.details(p))
            .collect();

        Ok(Page::new(items, page, total))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<CommentDetails>, RepoError> {
        let tables = self.tables.read().await;

        let mut comments: Vec<&Comment> = tables
            .comments
            .rows
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(comments
            .into_iter()
            .filter_map(|c| {
                let author = tables.users.rows.get(&c.author_id)?;
                Some(CommentDetails {
                    comment: c.clone(),
                    author: AuthorRef::from(author),
                })
            })
            .collect())
    }

    async fn find_for_post(
        &self,
        post_id: i32,
        comment_id: i32,
    ) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .rows
            .get(&comment_id)
            .filter(|c| c.post_id == post_id)
            .cloned())
    }
}
