//! Page templates. Every page extends `base.html`, which renders the
//! navigation and the pending flash notice from [`PageContext`].

use askama::Template;
use axum::response::Html;

use crate::{error::Result, models::flash::Flash};

/// Per-request data shared by every page.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Notice to show once on this page.
    pub flash: Option<Flash>,
    /// Login of the signed-in user, if any.
    pub user_login: Option<String>,
    /// How long the notice stays on screen, in milliseconds.
    pub toastr_timeout_ms: u64,
}

impl Default for PageContext {
    fn default() -> Self {
        Self {
            flash: None,
            user_login: None,
            toastr_timeout_ms: 2000,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub page: PageContext,
}

#[derive(Template)]
#[template(path = "ep1.html")]
pub struct Ep1Template {
    pub page: PageContext,
}

#[derive(Template)]
#[template(path = "ep2.html")]
pub struct Ep2Template {
    pub page: PageContext,
}

#[derive(Template)]
#[template(path = "ep3.html")]
pub struct Ep3Template {
    pub page: PageContext,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
}

#[derive(Template)]
#[template(path = "secrettrack.html")]
pub struct SecretTrackTemplate {
    pub page: PageContext,
    pub login: String,
}

#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    pub page: PageContext,
}

#[derive(Template)]
#[template(path = "500.html")]
pub struct ServerErrorTemplate {
    pub page: PageContext,
}

pub fn render<T: Template>(template: &T) -> Result<Html<String>> {
    Ok(Html(template.render()?))
}
