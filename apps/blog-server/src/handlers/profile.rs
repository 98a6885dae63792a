//! User profiles.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::error::{DomainError, RepoError, ValidationErrors};
use blogicum_core::policy::PostFilter;
use blogicum_shared::PageQuery;
use blogicum_shared::forms::ProfileForm;

use super::{USERNAME_TAKEN, current_user, profile_url};
use crate::middleware::auth::{Identity, OptionalIdentity, session_cookie};
use crate::middleware::csrf::CsrfToken;
use crate::middleware::error::AppResult;
use crate::render::base_context;
use crate::state::AppState;

/// GET /profile/{username} - the owner also sees hidden and scheduled posts.
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    csrf: CsrfToken,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let user = state
        .repos
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| DomainError::not_found("user", &username))?;

    let filter = PostFilter::by_author(user.id, identity.user_id(), Utc::now());
    let page = state
        .repos
        .posts
        .list(&filter, query.request(state.settings.posts_per_page))
        .await?;

    let mut context = base_context(identity.0.as_ref(), &csrf);
    context.insert("profile", &user);
    context.insert("is_owner", &!filter.is_public());
    context.insert("page_obj", &page);
    state.templates.page("blog/profile.html", &context)
}

fn render_form(
    state: &AppState,
    identity: &Identity,
    csrf: &CsrfToken,
    form: &ProfileForm,
    errors: &ValidationErrors,
) -> AppResult<HttpResponse> {
    let mut context = base_context(Some(identity), csrf);
    context.insert("form", form);
    context.insert("errors", errors);
    state.templates.page("blog/user.html", &context)
}

/// GET /profile/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    csrf: CsrfToken,
) -> AppResult<HttpResponse> {
    let user = current_user(&state, &identity).await?;
    render_form(&state, &identity, &csrf, &ProfileForm::from_user(&user), &ValidationErrors::new())
}

/// POST /profile/edit - a renamed user gets a fresh session cookie.
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    csrf: CsrfToken,
    form: web::Form<ProfileForm>,
) -> AppResult<HttpResponse> {
    csrf.verify(&form.csrf_token)?;
    let mut user = current_user(&state, &identity).await?;

    let mut errors = form.validate().err().unwrap_or_default();
    let username = form.username.trim();
    if !errors.has("username")
        && username != user.username
        && state.repos.users.find_by_username(username).await?.is_some()
    {
        errors.add("username", USERNAME_TAKEN);
    }
    if !errors.is_empty() {
        return render_form(&state, &identity, &csrf, &form, &errors);
    }

    form.apply(&mut user);
    let user = match state.repos.users.save(user).await {
        Ok(user) => user,
        Err(RepoError::Constraint(detail)) => {
            tracing::debug!(%detail, "Rename lost a username race");
            errors.add("username", USERNAME_TAKEN);
            return render_form(&state, &identity, &csrf, &form, &errors);
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = user.id, "Profile updated");

    let token = state.tokens.generate_token(user.id, &user.username)?;
    Ok(HttpResponse::Found()
        .insert_header((actix_web::http::header::LOCATION, profile_url(&user.username)))
        .cookie(session_cookie(
            token,
            state.tokens.expiration_seconds(),
            state.settings.cookie_secure,
        ))
        .finish())
}

