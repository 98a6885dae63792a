//! Server-side HTML rendering with Tera.

use actix_web::{HttpResponse, http::header::ContentType};
use tera::{Context, Tera};

use crate::middleware::auth::Identity;
use crate::middleware::csrf::CsrfToken;
use crate::middleware::error::AppResult;

/// Compiled templates, loaded once at startup.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Load every `*.html` file under `dir`; names are relative to it,
    /// e.g. `blog/detail.html`.
    pub fn load(dir: &str) -> Result<Self, tera::Error> {
        let tera = Tera::new(&format!("{}/**/*.html", dir.trim_end_matches('/')))?;
        tracing::debug!(count = tera.get_template_names().count(), "Templates loaded");
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, tera::Error> {
        self.tera.render(name, context)
    }

    /// Render `name` as a 200 HTML response.
    pub fn page(&self, name: &str, context: &Context) -> AppResult<HttpResponse> {
        let body = self.render(name, context)?;
        Ok(HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body))
    }
}

/// Values every page needs: the signed-in user for the header and the CSRF
/// token for forms.
pub fn base_context(user: Option<&Identity>, csrf: &CsrfToken) -> Context {
    let mut context = Context::new();
    context.insert("user", &user);
    context.insert("csrf_token", csrf.value());
    context
}

