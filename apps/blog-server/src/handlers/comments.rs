//! Comments under posts.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::domain::{Comment, PostDetails};
use blogicum_core::error::{DomainError, ValidationErrors};
use blogicum_core::policy::{Access, can_view, check_author};
use blogicum_shared::forms::{CommentForm, ConfirmForm};

use super::{post_url, redirect};
use crate::middleware::auth::Identity;
use crate::middleware::csrf::CsrfToken;
use crate::middleware::error::AppResult;
use crate::render::base_context;
use crate::state::AppState;

/// A post the user may see and therefore comment on.
async fn visible_post(
    state: &AppState,
    identity: &Identity,
    post_id: i32,
) -> AppResult<PostDetails> {
    let post = state
        .repos
        .posts
        .find_details(post_id)
        .await?
        .filter(|details| can_view(details, Some(identity.user_id), Utc::now()))
        .ok_or_else(|| DomainError::not_found("post", post_id))?;
    Ok(post)
}

/// Load a comment of `post_id` for its author; anyone else is sent back to
/// the post page.
async fn authored_comment(
    state: &AppState,
    identity: &Identity,
    post_id: i32,
    comment_id: i32,
) -> AppResult<Result<Comment, HttpResponse>> {
    let comment = state
        .repos
        .comments
        .find_for_post(post_id, comment_id)
        .await?
        .ok_or_else(|| DomainError::not_found("comment", comment_id))?;

    Ok(match check_author(&comment, identity.user_id) {
        Access::Granted => Ok(comment),
        Access::Denied => Err(redirect(post_url(post_id))),
    })
}

const COMMENT_FORM: &str = "blog/comment.html";
const COMMENT_DELETE: &str = "blog/comment_delete.html";

/// The comment form page, or the delete confirmation.
struct CommentPage<'a> {
    template: &'static str,
    post_id: i32,
    form: &'a CommentForm,
    errors: ValidationErrors,
    comment: Option<&'a Comment>,
}

impl CommentPage<'_> {
    fn render(
        self,
        state: &AppState,
        identity: &Identity,
        csrf: &CsrfToken,
    ) -> AppResult<HttpResponse> {
        let mut context = base_context(Some(identity), csrf);
        context.insert("post_id", &self.post_id);
        context.insert("form", self.form);
        context.insert("errors", &self.errors);
        context.insert("comment", &self.comment);
        state.templates.page(self.template, &context)
    }
}

/// GET /posts/{post_id}/comment
pub async fn add_form(
    state: web::Data<AppState>,
    identity: Identity,
    csrf: CsrfToken,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = visible_post(&state, &identity, path.into_inner()).await?;
    let form = CommentForm::default();
    CommentPage {
        template: COMMENT_FORM,
        post_id: post.post.id,
        form: &form,
        errors: ValidationErrors::new(),
        comment: None,
    }
    .render(&state, &identity, &csrf)
}

/// POST /posts/{post_id}/comment
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    csrf: CsrfToken,
    path: web::Path<i32>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    csrf.verify(&form.csrf_token)?;
    let post = visible_post(&state, &identity, path.into_inner()).await?;
    let post_id = post.post.id;

    let text = match form.validate() {
        Ok(text) => text,
        Err(errors) => {
            return CommentPage {
                template: COMMENT_FORM,
                post_id,
                form: &form,
                errors,
                comment: None,
            }
            .render(&state, &identity, &csrf);
        }
    };

    let comment = state
        .repos
        .comments
        .save(Comment::new(post_id, identity.user_id, text))
        .await?;
    tracing::info!(post_id, comment_id = comment.id, "Comment added");

    Ok(redirect(post_url(post_id)))
}

/// GET /posts/{post_id}/comment/{comment_id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    csrf: CsrfToken,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = match authored_comment(&state, &identity, post_id, comment_id).await? {
        Ok(comment) => comment,
        Err(response) => return Ok(response),
    };

    let form = CommentForm::from_comment(&comment);
    CommentPage {
        template: COMMENT_FORM,
        post_id,
        form: &form,
        errors: ValidationErrors::new(),
        comment: Some(&comment),
    }
    .render(&state, &identity, &csrf)
}

/// POST /posts/{post_id}/comment/{comment_id}/edit
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    csrf: CsrfToken,
    path: web::Path<(i32, i32)>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    csrf.verify(&form.csrf_token)?;
    let (post_id, comment_id) = path.into_inner();
    let mut comment = match authored_comment(&state, &identity, post_id, comment_id).await? {
        Ok(comment) => comment,
        Err(response) => return Ok(response),
    };

    match form.validate() {
        Ok(text) => comment.text = text,
        Err(errors) => {
            return CommentPage {
                template: COMMENT_FORM,
                post_id,
                form: &form,
                errors,
                comment: Some(&comment),
            }
            .render(&state, &identity, &csrf);
        }
    }

    state.repos.comments.save(comment).await?;
    tracing::info!(post_id, comment_id, "Comment updated");

    Ok(redirect(post_url(post_id)))
}

/// GET /posts/{post_id}/comment/{comment_id}/delete
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: Identity,
    csrf: CsrfToken,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = match authored_comment(&state, &identity, post_id, comment_id).await? {
        Ok(comment) => comment,
        Err(response) => return Ok(response),
    };

    let form = CommentForm::from_comment(&comment);
    CommentPage {
        template: COMMENT_DELETE,
        post_id,
        form: &form,
        errors: ValidationErrors::new(),
        comment: Some(&comment),
    }
    .render(&state, &identity, &csrf)
}

/// POST /posts/{post_id}/comment/{comment_id}/delete
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    csrf: CsrfToken,
    path: web::Path<(i32, i32)>,
    form: web::Form<ConfirmForm>,
) -> AppResult<HttpResponse> {
    csrf.verify(&form.csrf_token)?;
    let (post_id, comment_id) = path.into_inner();
    if let Err(response) = authored_comment(&state, &identity, post_id, comment_id).await? {
        return Ok(response);
    }

    state.repos.comments.delete(comment_id).await?;
    tracing::info!(post_id, comment_id, "Comment deleted");

    Ok(redirect(post_url(post_id)))
}
