//! HTML pages for 403, 404 and 500 responses.

use actix_web::{
    HttpMessage, HttpResponse,
    body::MessageBody,
    dev::ServiceResponse,
    http::{StatusCode, header::ContentType},
    middleware::{ErrorHandlerResponse, ErrorHandlers},
    web,
};

use super::auth::identify;
use super::csrf::CsrfToken;
use crate::observability::RequestId;
use crate::render::base_context;
use crate::state::AppState;

/// Error handler middleware rendering the site's error templates.
pub fn error_pages<B: MessageBody + 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::FORBIDDEN, |res| render(res, "pages/403csrf.html"))
        .handler(StatusCode::NOT_FOUND, |res| render(res, "pages/404.html"))
        .handler(StatusCode::INTERNAL_SERVER_ERROR, |res| {
            render(res, "pages/500.html")
        })
}

fn render<B>(
    res: ServiceResponse<B>,
    template: &str,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (req, res) = res.into_parts();
    let status = res.status();

    let body = req.app_data::<web::Data<AppState>>().and_then(|state| {
        let csrf = req.extensions().get::<CsrfToken>().cloned()?;
        let identity = identify(&req).ok();
        let mut context = base_context(identity.as_ref(), &csrf);
        context.insert("path", req.path());
        if let Some(id) = req.extensions().get::<RequestId>() {
            context.insert("request_id", id.as_str());
        }

        state
            .templates
            .render(template, &context)
            .map_err(|e| tracing::error!("Failed to render {}: {}", template, e))
            .ok()
    });

    let res = match body {
        Some(body) => ServiceResponse::new(
            req,
            HttpResponse::build(status)
                .content_type(ContentType::html())
                .body(body),
        )
        .map_into_right_body(),
        None => ServiceResponse::new(req, res).map_into_left_body(),
    };

    Ok(ErrorHandlerResponse::Response(res))
}
