//! Double-submit CSRF protection.
//!
//! Every response carries a `csrftoken` cookie; every state-changing form
//! posts the same value back in its `csrf_token` field. Handlers check the
//! pair with [`CsrfToken::verify`].

use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    cookie::{Cookie, SameSite},
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::LocalBoxFuture;
use std::future::{Ready, ready};
use uuid::Uuid;

use super::error::AppError;

pub const CSRF_COOKIE: &str = "csrftoken";

/// The request's CSRF token.
#[derive(Debug, Clone)]
pub struct CsrfToken {
    value: String,
    /// Minted for this request: the browser has no cookie to match yet.
    fresh: bool,
}

impl CsrfToken {
    fn from_cookie(value: Option<&str>) -> Self {
        match value.filter(|v| is_well_formed(v)) {
            Some(v) => Self {
                value: v.to_string(),
                fresh: false,
            },
            None => Self {
                value: Uuid::new_v4().simple().to_string(),
                fresh: true,
            },
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Accept `submitted` only when it equals the token the browser sent as
    /// a cookie.
    pub fn verify(&self, submitted: &str) -> Result<(), AppError> {
        if !self.fresh && constant_time_eq(self.value.as_bytes(), submitted.trim().as_bytes()) {
            Ok(())
        } else {
            tracing::warn!("CSRF token mismatch");
            Err(AppError::CsrfFailure)
        }
    }
}

fn is_well_formed(value: &str) -> bool {
    (16..=64).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Middleware that attaches a [`CsrfToken`] to each request and sets the
/// cookie when the browser did not have one.
pub struct CsrfMiddleware;

impl<S, B> Transform<S, ServiceRequest> for CsrfMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = CsrfService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CsrfService { service }))
    }
}

pub struct CsrfService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CsrfService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = CsrfToken::from_cookie(req.cookie(CSRF_COOKIE).as_ref().map(|c| c.value()));
        req.extensions_mut().insert(token.clone());

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            if token.fresh {
                let cookie = Cookie::build(CSRF_COOKIE, token.value)
                    .path("/")
                    .same_site(SameSite::Lax)
                    .finish();
                if let Err(e) = res.response_mut().add_cookie(&cookie) {
                    tracing::warn!("Could not set CSRF cookie: {}", e);
                }
            }

            Ok(res)
        })
    }
}

impl FromRequest for CsrfToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = req.extensions().get::<CsrfToken>().cloned();
        ready(token.ok_or_else(|| AppError::Internal("CSRF middleware is not installed".into())))
    }
}
