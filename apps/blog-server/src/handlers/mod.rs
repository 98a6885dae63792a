//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod pages;
mod posts;
mod profile;

use actix_web::{HttpResponse, http::header, web};

use blogicum_core::domain::User;
use blogicum_core::error::DomainError;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::index))
        .route("/health", web::get().to(health::health_check))
        .route("/category/{slug}", web::get().to(posts::category_posts))
        .service(
            web::scope("/posts")
                .route("/create", web::get().to(posts::create_form))
                .route("/create", web::post().to(posts::create))
                .route("/{post_id}", web::get().to(posts::detail))
                .route("/{post_id}/edit", web::get().to(posts::edit_form))
                .route("/{post_id}/edit", web::post().to(posts::edit))
                .route("/{post_id}/delete", web::get().to(posts::delete_form))
                .route("/{post_id}/delete", web::post().to(posts::delete))
                .route("/{post_id}/comment", web::get().to(comments::add_form))
                .route("/{post_id}/comment", web::post().to(comments::add))
                .route(
                    "/{post_id}/comment/{comment_id}/edit",
                    web::get().to(comments::edit_form),
                )
                .route(
                    "/{post_id}/comment/{comment_id}/edit",
                    web::post().to(comments::edit),
                )
                .route(
                    "/{post_id}/comment/{comment_id}/delete",
                    web::get().to(comments::delete_form),
                )
                .route(
                    "/{post_id}/comment/{comment_id}/delete",
                    web::post().to(comments::delete),
                ),
        )
        .service(
            web::scope("/profile")
                .route("/edit", web::get().to(profile::edit_form))
                .route("/edit", web::post().to(profile::edit))
                .route("/{username}", web::get().to(profile::profile)),
        )
        .service(
            web::scope("/auth")
                .route("/registration", web::get().to(auth::registration_form))
                .route("/registration", web::post().to(auth::register))
                .route("/login", web::get().to(auth::login_form))
                .route("/login", web::post().to(auth::login))
                .route("/logout", web::post().to(auth::logout)),
        )
        .service(
            web::scope("/pages")
                .route("/about", web::get().to(pages::about))
                .route("/rules", web::get().to(pages::rules)),
        );
}

const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// 302 to `location`.
fn redirect(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.as_ref()))
        .finish()
}

fn post_url(post_id: i32) -> String {
    format!("/posts/{}", post_id)
}

fn profile_url(username: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(username.as_bytes()).collect();
    format!("/profile/{}", encoded)
}

/// The signed-in user as stored now; the session may carry an older username.
async fn current_user(state: &AppState, identity: &Identity) -> AppResult<User> {
    let user = state
        .repos
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("user", identity.user_id))?;
    Ok(user)
}
