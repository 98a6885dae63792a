//! PostgreSQL repository implementations.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DbConn, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};

use blogicum_core::domain::{
    AuthorRef, Category, CategoryRef, Comment, CommentDetails, Location, LocationRef, Page,
    PageRequest, PostDetails, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::policy::PostFilter;
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Title)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn list_all(&self) -> Result<Vec<Location>, RepoError> {
        let result = LocationEntity::find()
            .order_by_asc(location::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// SQL form of [`PostFilter`]. Expects `categories` to be joined.
fn filter_condition(filter: &PostFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(now) = filter.visible_at {
        condition = condition
            .add(post::Column::IsPublished.eq(true))
            .add(post::Column::PubDate.lte(now.fixed_offset()))
            .add(category::Column::IsPublished.eq(true));
    }
    if let Some(category_id) = filter.category_id {
        condition = condition.add(post::Column::CategoryId.eq(category_id));
    }
    if let Some(author_id) = filter.author_id {
        condition = condition.add(post::Column::AuthorId.eq(author_id));
    }

    condition
}

/// The filtered, ordered post listing before pagination.
pub(crate) fn list_query(filter: &PostFilter) -> Select<PostEntity> {
    PostEntity::find()
        .join(JoinType::LeftJoin, post::Relation::Category.def())
        .filter(filter_condition(filter))
        .order_by_desc(post::Column::PubDate)
        .order_by_desc(post::Column::Id)
}

#[derive(Debug, FromQueryResult)]
struct CommentCount {
    post_id: i32,
    comment_count: i64,
}

/// Attach authors, categories, locations and comment counts to posts,
/// keeping the order of `posts`.
async fn annotate(db: &DbConn, posts: Vec<post::Model>) -> Result<Vec<PostDetails>, RepoError> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
    let author_ids: BTreeSet<i32> = posts.iter().map(|p| p.author_id).collect();
    let category_ids: BTreeSet<i32> = posts.iter().filter_map(|p| p.category_id).collect();
    let location_ids: BTreeSet<i32> = posts.iter().filter_map(|p| p.location_id).collect();

    let authors: HashMap<i32, AuthorRef> = UserEntity::find()
        .filter(user::Column::Id.is_in(author_ids))
        .all(db)
        .await
        .map_err(map_db_err)?
        .into_iter()
        .map(|m| {
            let user = User::from(m);
            (user.id, AuthorRef::from(&user))
        })
        .collect();

    let categories: HashMap<i32, CategoryRef> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        CategoryEntity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|m| {
                let category = Category::from(m);
                (category.id, CategoryRef::from(&category))
            })
            .collect()
    };

    let locations: HashMap<i32, LocationRef> = if location_ids.is_empty() {
        HashMap::new()
    } else {
        LocationEntity::find()
            .filter(location::Column::Id.is_in(location_ids))
            .all(db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|m| {
                let location = Location::from(m);
                (location.id, LocationRef::from(&location))
            })
            .collect()
    };

    let counts: HashMap<i32, i64> = CommentEntity::find()
        .select_only()
        .column(comment::Column::PostId)
        .column_as(Expr::col(comment::Column::Id).count(), "comment_count")
        .filter(comment::Column::PostId.is_in(post_ids))
        .group_by(comment::Column::PostId)
        .into_model::<CommentCount>()
        .all(db)
        .await
        .map_err(map_db_err)?
        .into_iter()
        .map(|row| (row.post_id, row.comment_count))
        .collect();

    let details = posts
        .into_iter()
        .filter_map(|model| {
            let Some(author) = authors.get(&model.author_id).cloned() else {
                tracing::warn!(post_id = model.id, "Post without author skipped");
                return None;
            };
            let category = model.category_id.and_then(|id| categories.get(&id).cloned());
            let location = model.location_id.and_then(|id| locations.get(&id).cloned());
            let comment_count = counts.get(&model.id).copied().unwrap_or(0).max(0) as u64;

            Some(PostDetails {
                post: model.into(),
                author,
                category,
                location,
                comment_count,
            })
        })
        .collect();

    Ok(details)
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_details(&self, id: i32) -> Result<Option<PostDetails>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(annotate(&self.db, vec![model]).await?.into_iter().next())
    }

    async fn list(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostDetails>, RepoError> {
        let paginator = list_query(filter).paginate(&self.db, page.per_page);

        let total = paginator.num_items().await.map_err(map_db_err)?;
        let page = page.clamp(total);
        let models = paginator
            .fetch_page(page.number - 1)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(?filter, page = page.number, total, "Listed posts");

        Ok(Page::new(annotate(&self.db, models).await?, page, total))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<CommentDetails>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|(comment, author)| {
                let author = User::from(author?);
                Some(CommentDetails {
                    comment: comment.into(),
                    author: AuthorRef::from(&author),
                })
            })
            .collect())
    }

    async fn find_for_post(
        &self,
        post_id: i32,
        comment_id: i32,
    ) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::Id.eq(comment_id))
            .filter(comment::Column::PostId.eq(post_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}
