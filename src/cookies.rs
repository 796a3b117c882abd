use base64::{Engine as _, engine::general_purpose};
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

use crate::{config::Config, models::flash::Flash};

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_id";
/// Cookie carrying a pending flash notice.
pub const FLASH_COOKIE: &str = "flash";

/// How long an unread flash notice survives, in seconds.
const FLASH_MAX_AGE_SECS: i64 = 60;

/// Creates an HTTP-only cookie scoped to the whole site.
///
/// Without `max_age` the cookie lasts for the browser session.
fn create_secure_cookie(
    name: &'static str,
    value: String,
    max_age: Option<Duration>,
    secure: bool,
) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);

    cookie.set_http_only(true);
    if secure {
        cookie.set_secure(true);
    }

    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    if let Some(max_age) = max_age {
        cookie.set_max_age(max_age);
    }
    cookie.set_path("/");

    cookie
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, "");
    cookie.set_max_age(Duration::seconds(0));
    cookie.set_path("/");
    cookie
}

/// Reads the session token from the request cookies.
pub fn session_token(cookies: &Cookies) -> Option<String> {
    cookies
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Hands `token` to the browser.
///
/// Remembered sessions get a persistent cookie matching the server-side
/// lifetime; others get a browser-session cookie.
pub fn set_session_cookie(cookies: &Cookies, token: String, remember: bool, config: &Config) {
    let max_age = remember.then(|| Duration::days(config.session_duration_days));
    cookies.add(create_secure_cookie(
        SESSION_COOKIE,
        token,
        max_age,
        config.secure_cookies,
    ));
}

/// Tells the browser to drop its session cookie.
pub fn clear_session_cookie(cookies: &Cookies) {
    cookies.remove(removal_cookie(SESSION_COOKIE));
}

/// Queues `flash` for the next rendered page.
pub fn push_flash(cookies: &Cookies, flash: &Flash, config: &Config) {
    match sonic_rs::to_string(flash) {
        Ok(json) => cookies.add(create_secure_cookie(
            FLASH_COOKIE,
            general_purpose::URL_SAFE_NO_PAD.encode(json),
            Some(Duration::seconds(FLASH_MAX_AGE_SECS)),
            config.secure_cookies,
        )),
        Err(e) => tracing::warn!("Flash serialization failed: {}", e),
    }
}

/// Takes the pending flash notice, if any, and clears it.
pub fn take_flash(cookies: &Cookies) -> Option<Flash> {
    let cookie = cookies.get(FLASH_COOKIE)?;
    cookies.remove(removal_cookie(FLASH_COOKIE));

    let bytes = general_purpose::URL_SAFE_NO_PAD.decode(cookie.value()).ok()?;
    match sonic_rs::from_slice::<Flash>(&bytes) {
        Ok(flash) => Some(flash),
        Err(e) => {
            tracing::debug!("Discarding unreadable flash cookie: {}", e);
            None
        }
    }
}
