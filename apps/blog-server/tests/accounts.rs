mod common;

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use async_trait::async_trait;

use blog_server::build_app;
use blogicum_core::domain::User;
use blogicum_core::error::RepoError;
use blogicum_core::ports::{BaseRepository, UserRepository};
use common::{CSRF, location, site, with_csrf};

/// Users whose name lookups miss, as when another request registers the
/// same name between the check and the insert.
struct LateLookup(Arc<dyn UserRepository>);

#[async_trait]
impl BaseRepository<User, i32> for LateLookup {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        self.0.find_by_id(id).await
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        self.0.save(user).await
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.0.delete(id).await
    }
}

#[async_trait]
impl UserRepository for LateLookup {
    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, RepoError> {
        Ok(None)
    }
}

fn registration(username: &str, password1: &str, password2: &str) -> TestRequest {
    with_csrf(TestRequest::post().uri("/auth/registration")).set_form([
        ("csrf_token", CSRF),
        ("username", username),
        ("email", "new@example.com"),
        ("password1", password1),
        ("password2", password2),
    ])
}

#[actix_rt::test]
async fn test_register_then_login() {
    let site = site().await;
    let app = test::init_service(build_app(site.state.clone())).await;

    let resp = test::call_service(&app, registration("natasha", "war-and-peace", "war-and-peace").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login");

    let user = site.state.repos.users.find_by_username("natasha").await.unwrap().unwrap();
    assert_ne!(user.password_hash, "war-and-peace");

    let login = with_csrf(TestRequest::post().uri("/auth/login"))
        .set_form([
            ("csrf_token", CSRF),
            ("username", "natasha"),
            ("password", "war-and-peace"),
            ("next", "/posts/create"),
        ])
        .to_request();
    let resp = test::call_service(&app, login).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/posts/create");

    let session = resp
        .response()
        .cookies()
        .find(|c| c.name() == "sessionid")
        .expect("session cookie");
    assert!(session.http_only().unwrap_or(false));

    let create = TestRequest::get()
        .uri("/posts/create")
        .cookie(Cookie::new("sessionid", session.value().to_string()))
        .to_request();
    assert_eq!(test::call_service(&app, create).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_registration_errors_are_shown() {
    let site = site().await;
    let app = test::init_service(build_app(site.state.clone())).await;

    let taken = test::call_service(&app, registration("leo", "war-and-peace", "war-and-peace").to_request()).await;
    assert_eq!(taken.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(taken).await.to_vec()).unwrap();
    assert!(body.contains("already exists"));

    let reserved = test::call_service(&app, registration("edit", "war-and-peace", "war-and-peace").to_request()).await;
    assert_eq!(reserved.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(reserved).await.to_vec()).unwrap();
    assert!(body.contains("This username is not available."));
    assert!(site.state.repos.users.find_by_username("edit").await.unwrap().is_none());

    let mismatch = test::call_service(&app, registration("pierre", "war-and-peace", "peace-and-war").to_request()).await;
    assert_eq!(mismatch.status(), StatusCode::OK);
    assert!(site.state.repos.users.find_by_username("pierre").await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_registration_race_shows_username_error() {
    let site = site().await;
    let mut state = site.state.clone();
    state.repos.users = Arc::new(LateLookup(site.state.repos.users.clone()));
    let app = test::init_service(build_app(state)).await;

    let resp = test::call_service(&app, registration("leo", "war-and-peace", "war-and-peace").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("A user with that username already exists."));
    assert!(!body.contains("duplicate username"));

    let rename = with_csrf(TestRequest::post().uri("/profile/edit"))
        .cookie(site.session(&site.anna))
        .set_form([
            ("csrf_token", CSRF),
            ("username", "leo"),
            ("first_name", ""),
            ("last_name", ""),
            ("email", ""),
        ])
        .to_request();
    let resp = test::call_service(&app, rename).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("A user with that username already exists."));

    let anna = site.state.repos.users.find_by_id(site.anna.id).await.unwrap().unwrap();
    assert_eq!(anna.username, "anna");
}

#[actix_rt::test]
async fn test_wrong_password_sets_no_session() {
    let site = site().await;
    let app = test::init_service(build_app(site.state.clone())).await;

    test::call_service(&app, registration("andrei", "austerlitz", "austerlitz").to_request()).await;

    let login = with_csrf(TestRequest::post().uri("/auth/login"))
        .set_form([("csrf_token", CSRF), ("username", "andrei"), ("password", "borodino")])
        .to_request();
    let resp = test::call_service(&app, login).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.response().cookies().all(|c| c.name() != "sessionid"));
}

#[actix_rt::test]
async fn test_login_ignores_external_next() {
    let site = site().await;
    let app = test::init_service(build_app(site.state.clone())).await;

    test::call_service(&app, registration("marya", "bald-hills", "bald-hills").to_request()).await;

    let login = with_csrf(TestRequest::post().uri("/auth/login"))
        .set_form([
            ("csrf_token", CSRF),
            ("username", "marya"),
            ("password", "bald-hills"),
            ("next", "//evil.example/"),
        ])
        .to_request();
    let resp = test::call_service(&app, login).await;
    assert_eq!(location(&resp), "/profile/marya");
}

#[actix_rt::test]
async fn test_logout_clears_session() {
    let site = site().await;
    let app = test::init_service(build_app(site.state.clone())).await;

    let req = with_csrf(TestRequest::post().uri("/auth/logout"))
        .cookie(site.session(&site.leo))
        .set_form([("csrf_token", CSRF)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == "sessionid")
        .expect("removal cookie");
    assert_eq!(cleared.value(), "");
}

#[actix_rt::test]
async fn test_profile_edit_renames_user() {
    let site = site().await;
    site.post(&site.leo, "Signed", |_| {}).await;
    let app = test::init_service(build_app(site.state.clone())).await;

    let taken = with_csrf(TestRequest::post().uri("/profile/edit"))
        .cookie(site.session(&site.leo))
        .set_form([
            ("csrf_token", CSRF),
            ("username", "anna"),
            ("first_name", ""),
            ("last_name", ""),
            ("email", ""),
        ])
        .to_request();
    assert_eq!(test::call_service(&app, taken).await.status(), StatusCode::OK);

    let rename = with_csrf(TestRequest::post().uri("/profile/edit"))
        .cookie(site.session(&site.leo))
        .set_form([
            ("csrf_token", CSRF),
            ("username", "lev"),
            ("first_name", "Lev"),
            ("last_name", "Tolstoy"),
            ("email", "lev@example.com"),
        ])
        .to_request();
    let resp = test::call_service(&app, rename).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/lev");
    assert!(resp.response().cookies().any(|c| c.name() == "sessionid"));

    let user = site.state.repos.users.find_by_id(site.leo.id).await.unwrap().unwrap();
    assert_eq!(user.username, "lev");
    assert_eq!(user.display_name(), "Lev Tolstoy");

    let profile = test::call_service(&app, TestRequest::get().uri("/profile/lev").to_request()).await;
    let body = String::from_utf8(test::read_body(profile).await.to_vec()).unwrap();
    assert!(body.contains("Signed"));
}

#[actix_rt::test]
async fn test_forms_require_matching_csrf_token() {
    let site = site().await;
    let post = site.post(&site.leo, "Protected", |_| {}).await;
    let app = test::init_service(build_app(site.state.clone())).await;
    let uri = format!("/posts/{}/comment", post.id);

    let missing = TestRequest::post()
        .uri(&uri)
        .cookie(site.session(&site.anna))
        .set_form([("text", "no token")])
        .to_request();
    let resp = test::call_service(&app, missing).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    // The site's 403 page, with a fresh token for the next attempt
    assert!(resp.response().cookies().any(|c| c.name() == "csrftoken"));

    let wrong = with_csrf(TestRequest::post().uri(&uri))
        .cookie(site.session(&site.anna))
        .set_form([("csrf_token", "ffffffffffffffffffffffffffffffff"), ("text", "forged")])
        .to_request();
    let resp = test::call_service(&app, wrong).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("could not be verified"));

    assert!(site.state.repos.comments.list_for_post(post.id).await.unwrap().is_empty());
}
