mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};

use blog_server::build_app;
use blogicum_core::domain::{Comment, Post};
use common::{CSRF, location, multipart, site, with_csrf};

#[actix_rt::test]
async fn test_anonymous_user_is_sent_to_login() {
    let site = site().await;
    let post = site.post(&site.leo, "Guarded", |_| {}).await;
    let app = test::init_service(build_app(site.state.clone())).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/posts/create").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login?next=%2Fposts%2Fcreate");

    let uri = format!("/posts/{}/comment", post.id);
    let req = with_csrf(TestRequest::post().uri(&uri))
        .set_form([("csrf_token", CSRF), ("text", "sneaky")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(location(&resp).starts_with("/auth/login?next="));
    assert!(site.state.repos.comments.list_for_post(post.id).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_create_post_takes_author_from_session() {
    let site = site().await;
    let app = test::init_service(build_app(site.state.clone())).await;

    let category = site.travel.id.to_string();
    let forged_author = site.anna.id.to_string();
    let req = multipart(
        with_csrf(TestRequest::post().uri("/posts/create")).cookie(site.session(&site.leo)),
        &[
            ("csrf_token", CSRF),
            ("title", "White nights"),
            ("text", "A walk along the river"),
            ("pub_date", "2024-06-21T22:00"),
            ("category", &category),
            ("location", ""),
            ("is_published", "on"),
            ("author", &forged_author),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/leo");

    let post: Post = site.state.repos.posts.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(post.title, "White nights");
    assert_eq!(post.author_id, site.leo.id);
    assert_eq!(post.location_id, None);
    assert!(post.is_published);
    assert!(post.image.is_none());
}

#[actix_rt::test]
async fn test_redirects_use_current_username_after_rename() {
    let site = site().await;
    let app = test::init_service(build_app(site.state.clone())).await;
    let old_session = site.session(&site.leo);

    let mut renamed = site.leo.clone();
    renamed.username = "leo2".into();
    site.state.repos.users.save(renamed).await.unwrap();

    let category = site.travel.id.to_string();
    let req = multipart(
        with_csrf(TestRequest::post().uri("/posts/create")).cookie(old_session.clone()),
        &[
            ("csrf_token", CSRF),
            ("title", "New name"),
            ("text", "Same author"),
            ("pub_date", "2024-06-21T22:00"),
            ("category", &category),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/leo2");

    let profile = TestRequest::get().uri("/profile/leo2").to_request();
    assert_eq!(test::call_service(&app, profile).await.status(), StatusCode::OK);

    let delete = with_csrf(TestRequest::post().uri("/posts/1/delete"))
        .cookie(old_session)
        .set_form([("csrf_token", CSRF)])
        .to_request();
    let resp = test::call_service(&app, delete).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/leo2");
}

#[actix_rt::test]
async fn test_invalid_post_form_is_shown_again() {
    let site = site().await;
    let app = test::init_service(build_app(site.state.clone())).await;

    let req = multipart(
        with_csrf(TestRequest::post().uri("/posts/create")).cookie(site.session(&site.leo)),
        &[
            ("csrf_token", CSRF),
            ("title", "No category"),
            ("text", "Body"),
            ("pub_date", "2024-06-21T22:00"),
            ("category", "999"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Select a valid choice."));
    assert!(body.contains("No category"));
    assert!(site.state.repos.posts.find_by_id(1).await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_non_author_cannot_edit_or_delete_post() {
    let site = site().await;
    let post = site.post(&site.leo, "Mine", |_| {}).await;
    let app = test::init_service(build_app(site.state.clone())).await;
    let post_url = format!("/posts/{}", post.id);

    let edit_page = TestRequest::get()
        .uri(&format!("/posts/{}/edit", post.id))
        .cookie(site.session(&site.anna))
        .to_request();
    let resp = test::call_service(&app, edit_page).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), post_url);

    let category = site.travel.id.to_string();
    let edit = multipart(
        with_csrf(TestRequest::post().uri(&format!("/posts/{}/edit", post.id)))
            .cookie(site.session(&site.anna)),
        &[
            ("csrf_token", CSRF),
            ("title", "Hijacked"),
            ("text", "Hijacked"),
            ("pub_date", "2024-06-21T22:00"),
            ("category", &category),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, edit).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), post_url);

    let delete = with_csrf(TestRequest::post().uri(&format!("/posts/{}/delete", post.id)))
        .cookie(site.session(&site.anna))
        .set_form([("csrf_token", CSRF)])
        .to_request();
    let resp = test::call_service(&app, delete).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), post_url);

    let stored = site.state.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Mine");
}

#[actix_rt::test]
async fn test_author_edits_post_and_keeps_image() {
    let site = site().await;
    let post = site
        .post(&site.leo, "Draft title", |p| p.image = Some("post_images/old.png".into()))
        .await;
    let app = test::init_service(build_app(site.state.clone())).await;

    let category = site.travel.id.to_string();
    let location_id = site.location.id.to_string();
    let req = multipart(
        with_csrf(TestRequest::post().uri(&format!("/posts/{}/edit", post.id)))
            .cookie(site.session(&site.leo)),
        &[
            ("csrf_token", CSRF),
            ("title", "Final title"),
            ("text", "Polished"),
            ("pub_date", "2024-06-21T22:00"),
            ("category", &category),
            ("location", &location_id),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}", post.id));

    let stored = site.state.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Final title");
    assert_eq!(stored.author_id, site.leo.id);
    assert_eq!(stored.image.as_deref(), Some("post_images/old.png"));
    // Checkbox left unticked
    assert!(!stored.is_published);
}

#[actix_rt::test]
async fn test_author_deletes_post_with_comments() {
    let site = site().await;
    let post = site.post(&site.leo, "Short-lived", |_| {}).await;
    let comment = site.comment(&site.anna, &post, "Nice").await;
    let app = test::init_service(build_app(site.state.clone())).await;

    let confirm = TestRequest::get()
        .uri(&format!("/posts/{}/delete", post.id))
        .cookie(site.session(&site.leo))
        .to_request();
    assert_eq!(test::call_service(&app, confirm).await.status(), StatusCode::OK);

    let req = with_csrf(TestRequest::post().uri(&format!("/posts/{}/delete", post.id)))
        .cookie(site.session(&site.leo))
        .set_form([("csrf_token", CSRF)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/leo");

    assert!(site.state.repos.posts.find_by_id(post.id).await.unwrap().is_none());
    let gone: Option<Comment> = site.state.repos.comments.find_by_id(comment.id).await.unwrap();
    assert!(gone.is_none());
}

#[actix_rt::test]
async fn test_comment_lifecycle_and_ownership() {
    let site = site().await;
    let post = site.post(&site.leo, "Open thread", |_| {}).await;
    let app = test::init_service(build_app(site.state.clone())).await;
    let post_url = format!("/posts/{}", post.id);

    let add = with_csrf(TestRequest::post().uri(&format!("{post_url}/comment")))
        .cookie(site.session(&site.anna))
        .set_form([("csrf_token", CSRF), ("text", "  Lovely  ")])
        .to_request();
    let resp = test::call_service(&app, add).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), post_url);

    let comments = site.state.repos.comments.list_for_post(post.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    let comment = &comments[0].comment;
    assert_eq!(comment.text, "Lovely");
    assert_eq!(comment.author_id, site.anna.id);

    let edit_uri = format!("{post_url}/comment/{}/edit", comment.id);
    let delete_uri = format!("{post_url}/comment/{}/delete", comment.id);

    // The post author does not own the comment
    let foreign_edit = with_csrf(TestRequest::post().uri(&edit_uri))
        .cookie(site.session(&site.leo))
        .set_form([("csrf_token", CSRF), ("text", "Edited by leo")])
        .to_request();
    let resp = test::call_service(&app, foreign_edit).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), post_url);

    let foreign_delete = with_csrf(TestRequest::post().uri(&delete_uri))
        .cookie(site.session(&site.leo))
        .set_form([("csrf_token", CSRF)])
        .to_request();
    let resp = test::call_service(&app, foreign_delete).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let unchanged = site.state.repos.comments.find_by_id(comment.id).await.unwrap().unwrap();
    assert_eq!(unchanged.text, "Lovely");

    let empty = with_csrf(TestRequest::post().uri(&edit_uri))
        .cookie(site.session(&site.anna))
        .set_form([("csrf_token", CSRF), ("text", "   ")])
        .to_request();
    assert_eq!(test::call_service(&app, empty).await.status(), StatusCode::OK);

    let edit = with_csrf(TestRequest::post().uri(&edit_uri))
        .cookie(site.session(&site.anna))
        .set_form([("csrf_token", CSRF), ("text", "Lovely indeed")])
        .to_request();
    assert_eq!(test::call_service(&app, edit).await.status(), StatusCode::FOUND);
    let edited = site.state.repos.comments.find_by_id(comment.id).await.unwrap().unwrap();
    assert_eq!(edited.text, "Lovely indeed");

    let delete = with_csrf(TestRequest::post().uri(&delete_uri))
        .cookie(site.session(&site.anna))
        .set_form([("csrf_token", CSRF)])
        .to_request();
    assert_eq!(test::call_service(&app, delete).await.status(), StatusCode::FOUND);
    assert!(site.state.repos.comments.find_by_id(comment.id).await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_comment_under_another_post_is_not_found() {
    let site = site().await;
    let first = site.post(&site.leo, "First", |_| {}).await;
    let second = site.post(&site.leo, "Second", |_| {}).await;
    let comment = site.comment(&site.anna, &first, "Here").await;
    let app = test::init_service(build_app(site.state.clone())).await;

    let req = TestRequest::get()
        .uri(&format!("/posts/{}/comment/{}/edit", second.id, comment.id))
        .cookie(site.session(&site.anna))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_cannot_comment_on_hidden_post() {
    let site = site().await;
    let post = site.post(&site.leo, "Secret", |p| p.is_published = false).await;
    let app = test::init_service(build_app(site.state.clone())).await;

    let req = with_csrf(TestRequest::post().uri(&format!("/posts/{}/comment", post.id)))
        .cookie(site.session(&site.anna))
        .set_form([("csrf_token", CSRF), ("text", "Found it")])
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
