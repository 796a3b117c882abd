use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Form,
};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    cookies,
    error::{AppError, Result},
    middleware_layer::auth::{current_user, CurrentUser},
    models::flash::Flash,
    services::auth as auth_service,
    state::AppState,
    templates::{
        self, Ep1Template, Ep2Template, Ep3Template, IndexTemplate, PageContext,
        SecretTrackTemplate,
    },
};

/// Form posted to the home page.
#[derive(Deserialize)]
pub struct HomeForm {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

/// Builds the shared page data: pending flash notice and signed-in user.
pub async fn page_context(state: &AppState, cookies: &Cookies) -> Result<PageContext> {
    let user_login = current_user(state, cookies)
        .await?
        .map(|current| current.user.login);

    Ok(PageContext {
        flash: cookies::take_flash(cookies),
        user_login,
        toastr_timeout_ms: state.config.toastr_timeout_ms,
    })
}

pub async fn index(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    let page = page_context(&state, &cookies).await?;
    Ok(templates::render(&IndexTemplate { page })?.into_response())
}

/// Handles the sign-up form embedded in the home page.
///
/// Goes through the same validation and hashing as registration, but does
/// not sign the new user in. The outcome is shown on the re-rendered home
/// page.
pub async fn index_submit(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<HomeForm>,
) -> Result<Response> {
    let mut page = page_context(&state, &cookies).await?;

    if !form.login.is_empty() && !form.password.is_empty() {
        tracing::info!("📝 Home page sign-up attempt: {}", form.login);
        page.flash = match auth_service::register_user(
            state.users.as_ref(),
            &form.login,
            &form.password,
        )
        .await
        {
            Ok(user) => Some(Flash::success(format!("Account {} created", user.login))),
            Err(AppError::Validation(msg)) => Some(Flash::error(msg)),
            Err(AppError::DuplicateLogin(_)) => Some(Flash::error("Login already taken")),
            Err(e) => return Err(e),
        };
    }

    Ok(templates::render(&IndexTemplate { page })?.into_response())
}

pub async fn ep1(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    let page = page_context(&state, &cookies).await?;
    Ok(templates::render(&Ep1Template { page })?.into_response())
}

pub async fn ep2(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    let page = page_context(&state, &cookies).await?;
    Ok(templates::render(&Ep2Template { page })?.into_response())
}

pub async fn ep3(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    let page = page_context(&state, &cookies).await?;
    Ok(templates::render(&Ep3Template { page })?.into_response())
}

/// The members-only page. Mounted behind `require_auth`.
pub async fn secrettrack(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    cookies: Cookies,
) -> Result<Response> {
    let page = PageContext {
        flash: cookies::take_flash(&cookies),
        user_login: Some(current.user.login.clone()),
        toastr_timeout_ms: state.config.toastr_timeout_ms,
    };

    Ok(templates::render(&SecretTrackTemplate {
        page,
        login: current.user.login,
    })?
    .into_response())
}

pub async fn not_found() -> Response {
    AppError::NotFound.into_response()
}
