#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::test::TestRequest;
use chrono::{DateTime, Duration, Utc};

use blog_server::config::{SiteSettings, default_templates_dir};
use blog_server::render::Templates;
use blog_server::state::AppState;
use blogicum_core::domain::{Category, Comment, Location, Post, PostDraft, User};
use blogicum_core::ports::TokenService;
use blogicum_infra::{InMemoryStore, JwtConfig, JwtTokenService, Repositories};

/// Value used for both the CSRF cookie and the form field.
pub const CSRF: &str = "0123456789abcdef0123456789abcdef";

const BOUNDARY: &str = "blogicum-test-boundary";

/// An in-memory site with two authors, a published and a hidden category
/// and one location.
pub struct TestSite {
    pub state: AppState,
    pub leo: User,
    pub anna: User,
    pub travel: Category,
    pub hidden: Category,
    pub location: Location,
    pub media_root: PathBuf,
}

pub async fn site() -> TestSite {
    let repos = Repositories::in_memory(Arc::new(InMemoryStore::new()));
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig::default()));
    let templates = Templates::load(default_templates_dir()).expect("templates load");
    let media_root = std::env::temp_dir().join(format!("blogicum-test-{}", uuid::Uuid::new_v4()));
    let settings = SiteSettings {
        posts_per_page: 10,
        cookie_secure: false,
        media_root: media_root.clone(),
    };
    let state = AppState::from_parts(repos, "memory", tokens, templates, settings);

    let leo = state
        .repos
        .users
        .save(User::new("leo".into(), "leo@example.com".into(), "x".into()))
        .await
        .unwrap();
    let anna = state
        .repos
        .users
        .save(User::new("anna".into(), "anna@example.com".into(), "x".into()))
        .await
        .unwrap();

    let travel = state
        .repos
        .categories
        .save(Category::new("Travel".into(), "Trips".into(), "travel".into()))
        .await
        .unwrap();
    let mut hidden = Category::new("Drafts".into(), "Not yet".into(), "hidden".into());
    hidden.is_published = false;
    let hidden = state.repos.categories.save(hidden).await.unwrap();

    let location = state
        .repos
        .locations
        .save(Location::new("Tula".into()))
        .await
        .unwrap();

    TestSite {
        state,
        leo,
        anna,
        travel,
        hidden,
        location,
        media_root,
    }
}

impl TestSite {
    /// Store a post directly, bypassing the web layer.
    pub async fn post(&self, author: &User, title: &str, build: impl FnOnce(&mut Post)) -> Post {
        let mut post = Post::new(
            author.id,
            PostDraft {
                title: title.to_string(),
                text: format!("{title} text"),
                pub_date: Utc::now() - Duration::hours(1),
                category_id: self.travel.id,
                location_id: Some(self.location.id),
                is_published: true,
            },
        );
        build(&mut post);
        self.state.repos.posts.save(post).await.unwrap()
    }

    pub async fn comment(&self, author: &User, post: &Post, text: &str) -> Comment {
        self.state
            .repos
            .comments
            .save(Comment::new(post.id, author.id, text.to_string()))
            .await
            .unwrap()
    }

    /// Session cookie for `user`.
    pub fn session(&self, user: &User) -> Cookie<'static> {
        let token = self.state.tokens.generate_token(user.id, &user.username).unwrap();
        Cookie::new("sessionid", token)
    }
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(hours)
}

/// Attach the CSRF cookie matching [`CSRF`].
pub fn with_csrf(req: TestRequest) -> TestRequest {
    req.cookie(Cookie::new("csrftoken", CSRF))
}

/// A multipart/form-data body made of text fields.
pub fn multipart(req: TestRequest, fields: &[(&str, &str)]) -> TestRequest {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    req.insert_header((
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    ))
    .set_payload(body)
}

pub fn location(resp: &actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
