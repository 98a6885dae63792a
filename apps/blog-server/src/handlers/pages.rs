//! Static pages.

use actix_web::{HttpResponse, web};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::csrf::CsrfToken;
use crate::middleware::error::AppResult;
use crate::render::base_context;
use crate::state::AppState;

pub async fn about(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    csrf: CsrfToken,
) -> AppResult<HttpResponse> {
    let context = base_context(identity.0.as_ref(), &csrf);
    state.templates.page("pages/about.html", &context)
}

pub async fn rules(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    csrf: CsrfToken,
) -> AppResult<HttpResponse> {
    let context = base_context(identity.0.as_ref(), &csrf);
    state.templates.page("pages/rules.html", &context)
}
