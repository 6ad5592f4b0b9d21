//! Session context extraction and session cookies

use async_trait::async_trait;
use axum::http::{
    header::{AUTHORIZATION, SET_COOKIE},
    request::Parts,
    HeaderName,
};
use axum::extract::FromRequestParts;
use axum_extra::extract::CookieJar;
use std::convert::Infallible;
use std::time::Duration;

use crate::services::AuthSession;

pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";

/// Provider session carried by the incoming request
///
/// The access token comes from the `sb-access-token` cookie, falling back to
/// an `Authorization: Bearer` header. A request without either is anonymous.
#[derive(Debug, Default, Clone)]
pub struct SessionContext {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionContext {
    pub fn is_anonymous(&self) -> bool {
        self.access_token.is_none()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = |name: &str| {
            jar.get(name)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty())
        };

        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_string);

        Ok(SessionContext {
            access_token: cookie(ACCESS_TOKEN_COOKIE).or(bearer),
            refresh_token: cookie(REFRESH_TOKEN_COOKIE),
        })
    }
}

/// Token of an `Authorization` value using the Bearer scheme, matched
/// case-insensitively
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn cookie_header(name: &str, value: &str, max_age_secs: u64, secure: bool) -> (HeaderName, String) {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        name, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    (SET_COOKIE, cookie)
}

/// `Set-Cookie` headers persisting a freshly issued session.
/// Empty when the provider issued no session.
pub fn session_cookies(
    session: &AuthSession,
    lifetime: Duration,
    secure: bool,
) -> Vec<(HeaderName, String)> {
    let max_age = lifetime.as_secs();
    [
        (ACCESS_TOKEN_COOKIE, session.access_token()),
        (REFRESH_TOKEN_COOKIE, session.refresh_token()),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|v| cookie_header(name, v, max_age, secure)))
    .collect()
}

/// `Set-Cookie` headers expiring both session cookies
pub fn cleared_session_cookies(secure: bool) -> Vec<(HeaderName, String)> {
    vec![
        cookie_header(ACCESS_TOKEN_COOKIE, "", 0, secure),
        cookie_header(REFRESH_TOKEN_COOKIE, "", 0, secure),
    ]
}
