use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    cookies,
    error::{AppError, Result},
    handlers::pages::page_context,
    middleware_layer::auth::CurrentUser,
    models::flash::Flash,
    services::auth as auth_service,
    state::AppState,
    templates::{self, LoginTemplate, RegisterTemplate},
};

/// The form payload for user registration.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

/// The form payload for user login.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
    /// Checkbox; present when ticked.
    #[serde(default)]
    pub remember: Option<String>,
}

pub async fn register_page(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    let page = page_context(&state, &cookies).await?;
    Ok(templates::render(&RegisterTemplate { page })?.into_response())
}

pub async fn login_page(State(state): State<AppState>, cookies: Cookies) -> Result<Response> {
    let page = page_context(&state, &cookies).await?;
    Ok(templates::render(&LoginTemplate { page })?.into_response())
}

/// Handles user registration.
///
/// On success the new user is signed in with a remembered session.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(payload): Form<RegisterForm>,
) -> Result<Response> {
    tracing::info!("📝 Register attempt: {}", payload.login);

    let user = match auth_service::register_user(
        state.users.as_ref(),
        &payload.login,
        &payload.password,
    )
    .await
    {
        Ok(user) => user,
        Err(AppError::Validation(msg)) => {
            tracing::debug!("Registration rejected: {}", msg);
            cookies::push_flash(&cookies, &Flash::error(msg), &state.config);
            return Ok(Redirect::to("/register").into_response());
        }
        Err(AppError::DuplicateLogin(login)) => {
            tracing::info!("Registration with taken login: {}", login);
            cookies::push_flash(&cookies, &Flash::error("Login already taken"), &state.config);
            return Ok(Redirect::to("/register").into_response());
        }
        Err(e) => return Err(e),
    };

    let token = state.sessions.establish(user.id, true).await?;
    cookies::set_session_cookie(&cookies, token, true, &state.config);
    cookies::push_flash(&cookies, &Flash::success("Registration successful"), &state.config);

    tracing::info!("✅ User registered: {}", user.id);

    Ok(Redirect::to("/").into_response())
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(payload): Form<LoginForm>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt: {}", payload.login);

    let user = match auth_service::authenticate_user(
        state.users.as_ref(),
        &payload.login,
        &payload.password,
    )
    .await
    {
        Ok(user) => user,
        Err(AppError::InvalidCredentials) => {
            tracing::warn!("❌ Invalid credentials for: {}", payload.login);
            cookies::push_flash(&cookies, &Flash::error("Invalid credentials"), &state.config);
            return Ok(Redirect::to("/login").into_response());
        }
        Err(e) => return Err(e),
    };

    let remember = payload.remember.is_some();
    let token = state.sessions.establish(user.id, remember).await?;
    cookies::set_session_cookie(&cookies, token, remember, &state.config);
    cookies::push_flash(&cookies, &Flash::success("Login successful"), &state.config);

    tracing::info!("✅ User logged in: {}", user.id);

    Ok(Redirect::to("/").into_response())
}

/// Handles user logout. Mounted behind `require_auth`.
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    cookies: Cookies,
) -> Result<Response> {
    tracing::info!("👋 Logout for user: {}", current.user.id);

    state.sessions.destroy(&current.token).await?;
    cookies::clear_session_cookie(&cookies);

    tracing::info!("✅ User logged out: {}", current.user.id);

    Ok(Redirect::to("/").into_response())
}
