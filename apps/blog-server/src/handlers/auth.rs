//! Registration, login and logout.

use actix_web::{HttpResponse, http::header, web};
use serde::Deserialize;

use blogicum_core::domain::User;
use blogicum_core::error::{RepoError, ValidationErrors};
use blogicum_shared::forms::{ConfirmForm, LoginForm, RegistrationForm};

use super::{USERNAME_TAKEN, profile_url, redirect};
use crate::middleware::auth::{OptionalIdentity, logout_cookie, session_cookie};
use crate::middleware::csrf::CsrfToken;
use crate::middleware::error::AppResult;
use crate::render::base_context;
use crate::state::AppState;

/// Only local absolute paths are followed after login.
fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}

fn render_registration(
    state: &AppState,
    identity: &OptionalIdentity,
    csrf: &CsrfToken,
    form: &RegistrationForm,
    errors: &ValidationErrors,
) -> AppResult<HttpResponse> {
    let mut context = base_context(identity.0.as_ref(), csrf);
    context.insert("form", form);
    context.insert("errors", errors);
    state
        .templates
        .page("registration/registration_form.html", &context)
}

/// GET /auth/registration
pub async fn registration_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    csrf: CsrfToken,
) -> AppResult<HttpResponse> {
    render_registration(
        &state,
        &identity,
        &csrf,
        &RegistrationForm::default(),
        &ValidationErrors::new(),
    )
}

/// POST /auth/registration - creates the account; the user then logs in.
pub async fn register(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    csrf: CsrfToken,
    form: web::Form<RegistrationForm>,
) -> AppResult<HttpResponse> {
    csrf.verify(&form.csrf_token)?;

    let mut errors = form.validate().err().unwrap_or_default();
    let username = form.username.trim();
    if !errors.has("username") && state.repos.users.find_by_username(username).await?.is_some() {
        errors.add("username", USERNAME_TAKEN);
    }
    if !errors.is_empty() {
        return render_registration(&state, &identity, &csrf, &form, &errors);
    }

    let password_hash = state.passwords.hash(&form.password1)?;
    let new_user = User::new(username.to_string(), form.email.trim().to_string(), password_hash);
    let user = match state.repos.users.save(new_user).await {
        Ok(user) => user,
        // Someone registered the same name after the check above.
        Err(RepoError::Constraint(detail)) => {
            tracing::debug!(%detail, "Registration lost a username race");
            errors.add("username", USERNAME_TAKEN);
            return render_registration(&state, &identity, &csrf, &form, &errors);
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok(redirect("/auth/login"))
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

fn render_login(
    state: &AppState,
    identity: &OptionalIdentity,
    csrf: &CsrfToken,
    form: &LoginForm,
    failed: bool,
) -> AppResult<HttpResponse> {
    let mut context = base_context(identity.0.as_ref(), csrf);
    context.insert("form", form);
    context.insert("failed", &failed);
    state.templates.page("registration/login.html", &context)
}

/// GET /auth/login
pub async fn login_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    csrf: CsrfToken,
    query: web::Query<NextQuery>,
) -> AppResult<HttpResponse> {
    let form = LoginForm {
        next: safe_next(query.next.as_deref()).map(str::to_string),
        ..LoginForm::default()
    };
    render_login(&state, &identity, &csrf, &form, false)
}

/// POST /auth/login - sets the session cookie and follows `next`, else
/// goes to the user's profile.
pub async fn login(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    csrf: CsrfToken,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    csrf.verify(&form.csrf_token)?;

    let user = state.repos.users.find_by_username(form.username.trim()).await?;
    let user = match user {
        Some(user) if state.passwords.verify(&form.password, &user.password_hash)? => user,
        _ => {
            tracing::debug!(username = %form.username, "Login failed");
            return render_login(&state, &identity, &csrf, &form, true);
        }
    };

    let token = state.tokens.generate_token(user.id, &user.username)?;
    let location = safe_next(form.next.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| profile_url(&user.username));
    tracing::info!(user_id = user.id, "User logged in");

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(session_cookie(
            token,
            state.tokens.expiration_seconds(),
            state.settings.cookie_secure,
        ))
        .finish())
}

/// POST /auth/logout
pub async fn logout(
    state: web::Data<AppState>,
    csrf: CsrfToken,
    form: web::Form<ConfirmForm>,
) -> AppResult<HttpResponse> {
    csrf.verify(&form.csrf_token)?;

    let context = base_context(None, &csrf);
    let body = state
        .templates
        .render("registration/logged_out.html", &context)?;

    Ok(HttpResponse::Ok()
        .content_type(header::ContentType::html())
        .cookie(logout_cookie())
        .body(body))
}
