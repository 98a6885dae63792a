//! # Blogicum Server
//!
//! Server-rendered blog: public feeds, author-owned posts and comments,
//! session-cookie accounts.

pub mod config;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod observability;
pub mod render;
pub mod state;
pub mod telemetry;

use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::NormalizePath,
    web,
};
use tracing_actix_web::TracingLogger;

use middleware::csrf::CsrfMiddleware;
use middleware::error_pages::error_pages;
use observability::RequestIdMiddleware;
use state::AppState;

/// The full application: routes, media files and middleware.
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let media_root = state.settings.media_root.clone();

    App::new()
        .app_data(web::Data::new(state))
        .configure(handlers::configure_routes)
        .service(actix_files::Files::new("/media", media_root))
        .wrap(error_pages())
        .wrap(CsrfMiddleware)
        .wrap(RequestIdMiddleware)
        .wrap(TracingLogger::default())
        // Outermost: `/posts/1/` and `/posts/1` hit the same route
        .wrap(NormalizePath::trim())
}
