use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::{
    cookies,
    error::{AppError, Result},
    models::user::User,
    state::AppState,
};

/// The user behind the current request, inserted by [`require_auth`].
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// Resolves the session cookie to a user.
///
/// A missing, unknown or expired token, or a token whose user no longer
/// exists, yields `None`. Stale cookies are cleared.
pub async fn current_user(state: &AppState, cookies: &Cookies) -> Result<Option<CurrentUser>> {
    let Some(token) = cookies::session_token(cookies) else {
        return Ok(None);
    };

    let Some(user_id) = state.sessions.resolve(&token).await? else {
        tracing::debug!("❌ Session cookie does not resolve");
        cookies::clear_session_cookie(cookies);
        return Ok(None);
    };

    let Some(user) = state.users.find_by_id(user_id).await? else {
        tracing::warn!("❌ Session bound to missing user: {}", user_id);
        state.sessions.destroy(&token).await?;
        cookies::clear_session_cookie(cookies);
        return Ok(None);
    };

    Ok(Some(CurrentUser { user, token }))
}

/// A middleware that requires a valid session to be present.
///
/// Rejects with 401 before the handler runs; [`redirect_unauthorized`]
/// turns that into a redirect to the login page.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    tracing::debug!("🔐 Checking authentication...");

    let current = current_user(&state, &cookies).await?.ok_or_else(|| {
        tracing::warn!("❌ Unauthenticated request to {}", request.uri().path());
        AppError::Unauthenticated
    })?;

    tracing::debug!("✅ User authenticated: {}", current.user.id);

    request.extensions_mut().insert(current);

    Ok(next.run(request).await)
}

/// Rewrites every 401 response into a redirect to the login page.
pub async fn redirect_unauthorized(response: Response) -> Response {
    if response.status() == StatusCode::UNAUTHORIZED {
        return Redirect::to("/login").into_response();
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    fn location(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    #[tokio::test]
    async fn any_unauthorized_response_becomes_login_redirect() {
        let response = redirect_unauthorized(StatusCode::UNAUTHORIZED.into_response()).await;

        assert!(response.status().is_redirection());
        assert_eq!(location(&response), Some("/login"));

        let from_handler = (StatusCode::UNAUTHORIZED, "nope").into_response();
        let response = redirect_unauthorized(from_handler).await;
        assert_eq!(location(&response), Some("/login"));
    }

    #[tokio::test]
    async fn other_responses_pass_through() {
        for status in [StatusCode::OK, StatusCode::NOT_FOUND, StatusCode::FORBIDDEN] {
            let response = redirect_unauthorized(status.into_response()).await;

            assert_eq!(response.status(), status);
            assert_eq!(location(&response), None);
        }
    }

    #[tokio::test]
    async fn unauthenticated_error_is_redirected() {
        let response = redirect_unauthorized(AppError::Unauthenticated.into_response()).await;

        assert_eq!(location(&response), Some("/login"));
    }
}
