//! Feeds, post pages and the author's post management.

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::{HttpResponse, web};
use chrono::Utc;
use tera::Context;

use blogicum_core::domain::{Post, PostDraft};
use blogicum_core::error::{DomainError, ValidationErrors};
use blogicum_core::policy::{Access, PostFilter, can_view, check_author};
use blogicum_shared::PageQuery;
use blogicum_shared::forms::{CommentForm, ConfirmForm, PostFields};

use super::{current_user, post_url, profile_url, redirect};
use crate::media;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::csrf::CsrfToken;
use crate::middleware::error::AppResult;
use crate::render::base_context;
use crate::state::AppState;

/// Post form as submitted by the browser.
///
/// There is no author field; unknown fields such as a forged `author` are
/// ignored and the post always belongs to the signed-in user.
#[derive(MultipartForm)]
pub struct PostUpload {
    csrf_token: Option<Text<String>>,
    title: Option<Text<String>>,
    text: Option<Text<String>>,
    pub_date: Option<Text<String>>,
    category: Option<Text<String>>,
    location: Option<Text<String>>,
    is_published: Option<Text<String>>,
    #[multipart(limit = "10MiB")]
    image: Option<TempFile>,
}

fn text_value(field: &Option<Text<String>>) -> String {
    field.as_ref().map(|t| t.0.clone()).unwrap_or_default()
}

impl PostUpload {
    fn csrf_token(&self) -> String {
        text_value(&self.csrf_token)
    }

    fn fields(&self) -> PostFields {
        PostFields {
            title: text_value(&self.title),
            text: text_value(&self.text),
            pub_date: text_value(&self.pub_date),
            category: text_value(&self.category),
            location: text_value(&self.location),
            is_published: self
                .is_published
                .as_ref()
                .is_some_and(|v| matches!(v.0.as_str(), "on" | "true" | "1")),
        }
    }

    /// The chosen file; browsers send an empty part when none was picked.
    fn image(&self) -> Option<&TempFile> {
        self.image.as_ref().filter(|file| {
            file.size > 0 && file.file_name.as_deref().is_some_and(|name| !name.is_empty())
        })
    }
}

/// A checked submission, ready to be stored.
struct Submission {
    draft: PostDraft,
    image_extension: Option<String>,
}

/// Validate fields, category and location choices and the image.
async fn check_submission(
    state: &AppState,
    upload: &PostUpload,
) -> AppResult<Result<Submission, ValidationErrors>> {
    let mut errors = ValidationErrors::new();

    let draft = match upload.fields().to_draft() {
        Ok(draft) => Some(draft),
        Err(e) => {
            errors.merge(e);
            None
        }
    };

    if let Some(draft) = &draft {
        if state.repos.categories.find_by_id(draft.category_id).await?.is_none() {
            errors.add("category", "Select a valid choice.");
        }
        if let Some(location_id) = draft.location_id {
            if state.repos.locations.find_by_id(location_id).await?.is_none() {
                errors.add("location", "Select a valid choice.");
            }
        }
    }

    let image_extension = match upload.image() {
        Some(file) => {
            let extension = file.file_name.as_deref().and_then(media::image_extension);
            if extension.is_none() {
                errors.add(
                    "image",
                    "Upload a valid image (jpg, jpeg, png, gif or webp).",
                );
            }
            extension
        }
        None => None,
    };

    Ok(match draft {
        Some(draft) if errors.is_empty() => Ok(Submission {
            draft,
            image_extension,
        }),
        _ => Err(errors),
    })
}

/// Store the uploaded image, if any, and return its media-relative path.
async fn store_upload(
    state: &AppState,
    upload: &PostUpload,
    extension: Option<&str>,
) -> AppResult<Option<String>> {
    match (upload.image(), extension) {
        (Some(file), Some(extension)) => {
            let path =
                media::store_image(&state.settings.media_root, file.file.path(), extension)
                    .await?;
            Ok(Some(path))
        }
        _ => Ok(None),
    }
}

fn not_found(id: i32) -> DomainError {
    DomainError::not_found("post", id)
}

/// GET / - every public post, newest first.
pub async fn index(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    csrf: CsrfToken,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let filter = PostFilter::public(Utc::now());
    let page = state
        .repos
        .posts
        .list(&filter, query.request(state.settings.posts_per_page))
        .await?;

    let mut context = base_context(identity.0.as_ref(), &csrf);
    context.insert("page_obj", &page);
    state.templates.page("blog/index.html", &context)
}

/// GET /category/{slug} - public posts of a published category.
pub async fn category_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    csrf: CsrfToken,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let category = state
        .repos
        .categories
        .find_by_slug(&slug)
        .await?
        .filter(|category| category.is_published)
        .ok_or_else(|| DomainError::not_found("category", &slug))?;

    let filter = PostFilter::in_category(category.id, Utc::now());
    let page = state
        .repos
        .posts
        .list(&filter, query.request(state.settings.posts_per_page))
        .await?;

    let mut context = base_context(identity.0.as_ref(), &csrf);
    context.insert("category", &category);
    context.insert("page_obj", &page);
    state.templates.page("blog/category.html", &context)
}

/// GET /posts/{post_id} - a post with its comments. Authors also see their
/// hidden and scheduled posts; everyone else gets 404 for them.
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    csrf: CsrfToken,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .repos
        .posts
        .find_details(post_id)
        .await?
        .filter(|details| can_view(details, identity.user_id(), Utc::now()))
        .ok_or_else(|| not_found(post_id))?;

    let comments = state.repos.comments.list_for_post(post_id).await?;

    let mut context = base_context(identity.0.as_ref(), &csrf);
    context.insert("is_author", &(identity.user_id() == Some(post.post.author_id)));
    context.insert("post", &post);
    context.insert("comments", &comments);
    context.insert("form", &CommentForm::default());
    context.insert("errors", &ValidationErrors::new());
    state.templates.page("blog/detail.html", &context)
}

async fn render_form(
    state: &AppState,
    identity: &Identity,
    csrf: &CsrfToken,
    form: &PostFields,
    errors: &ValidationErrors,
    post: Option<&Post>,
) -> AppResult<HttpResponse> {
    let categories = state.repos.categories.list_all().await?;
    let locations = state.repos.locations.list_all().await?;

    let mut context: Context = base_context(Some(identity), csrf);
    context.insert("form", form);
    context.insert("errors", errors);
    context.insert("categories", &categories);
    context.insert("locations", &locations);
    context.insert("post", &post);
    state.templates.page("blog/create.html", &context)
}

/// GET /posts/create
pub async fn create_form(
    state: web::Data<AppState>,
    identity: Identity,
    csrf: CsrfToken,
) -> AppResult<HttpResponse> {
    let form = PostFields::blank(Utc::now());
    render_form(&state, &identity, &csrf, &form, &ValidationErrors::new(), None).await
}

/// POST /posts/create - the new post is owned by the signed-in user.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    csrf: CsrfToken,
    MultipartForm(upload): MultipartForm<PostUpload>,
) -> AppResult<HttpResponse> {
    csrf.verify(&upload.csrf_token())?;

    let submission = match check_submission(&state, &upload).await? {
        Ok(submission) => submission,
        Err(errors) => {
            return render_form(&state, &identity, &csrf, &upload.fields(), &errors, None).await;
        }
    };

    let mut post = Post::new(identity.user_id, submission.draft);
    post.image = store_upload(&state, &upload, submission.image_extension.as_deref()).await?;

    let post = state.repos.posts.save(post).await?;
    tracing::info!(post_id = post.id, author_id = identity.user_id, "Post created");

    let author = current_user(&state, &identity).await?;
    Ok(redirect(profile_url(&author.username)))
}

/// Load a post for its author; anyone else is sent back to the post page.
async fn authored_post(
    state: &AppState,
    identity: &Identity,
    post_id: i32,
) -> AppResult<Result<Post, HttpResponse>> {
    let post = state
        .repos
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| not_found(post_id))?;

    Ok(match check_author(&post, identity.user_id) {
        Access::Granted => Ok(post),
        Access::Denied => {
            tracing::debug!(post_id, user_id = identity.user_id, "Not the author");
            Err(redirect(post_url(post_id)))
        }
    })
}

/// GET /posts/{post_id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    csrf: CsrfToken,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = match authored_post(&state, &identity, path.into_inner()).await? {
        Ok(post) => post,
        Err(response) => return Ok(response),
    };

    let form = PostFields::from_post(&post);
    render_form(&state, &identity, &csrf, &form, &ValidationErrors::new(), Some(&post)).await
}

/// POST /posts/{post_id}/edit - without a new file the old image stays.
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    csrf: CsrfToken,
    path: web::Path<i32>,
    MultipartForm(upload): MultipartForm<PostUpload>,
) -> AppResult<HttpResponse> {
    csrf.verify(&upload.csrf_token())?;

    let mut post = match authored_post(&state, &identity, path.into_inner()).await? {
        Ok(post) => post,
        Err(response) => return Ok(response),
    };

    let submission = match check_submission(&state, &upload).await? {
        Ok(submission) => submission,
        Err(errors) => {
            let form = upload.fields();
            return render_form(&state, &identity, &csrf, &form, &errors, Some(&post)).await;
        }
    };

    post.apply(submission.draft);
    let replaced = match store_upload(&state, &upload, submission.image_extension.as_deref()).await? {
        Some(image) => post.image.replace(image),
        None => None,
    };

    let post = state.repos.posts.save(post).await?;
    if let Some(old) = replaced {
        media::remove_image(&state.settings.media_root, &old).await;
    }
    tracing::info!(post_id = post.id, "Post updated");

    Ok(redirect(post_url(post.id)))
}

/// GET /posts/{post_id}/delete - confirmation page.
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: Identity,
    csrf: CsrfToken,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    if let Err(response) = authored_post(&state, &identity, post_id).await? {
        return Ok(response);
    }
    let details = state
        .repos
        .posts
        .find_details(post_id)
        .await?
        .ok_or_else(|| not_found(post_id))?;

    let mut context = base_context(Some(&identity), &csrf);
    context.insert("post", &details);
    state.templates.page("blog/post_delete.html", &context)
}

/// POST /posts/{post_id}/delete - removes the post and its comments.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    csrf: CsrfToken,
    path: web::Path<i32>,
    form: web::Form<ConfirmForm>,
) -> AppResult<HttpResponse> {
    csrf.verify(&form.csrf_token)?;

    let post = match authored_post(&state, &identity, path.into_inner()).await? {
        Ok(post) => post,
        Err(response) => return Ok(response),
    };

    state.repos.posts.delete(post.id).await?;
    if let Some(image) = &post.image {
        media::remove_image(&state.settings.media_root, image).await;
    }
    tracing::info!(post_id = post.id, "Post deleted");

    let author = current_user(&state, &identity).await?;
    Ok(redirect(profile_url(&author.username)))
}
