use axum::body::Body;
use axum::extract::FromRequestParts;
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::request::Parts;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;

pub const SESSION_COOKIE: &str = "webfm_session";

/// The browser session a request belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session middleware is not installed".to_string()))
    }
}

/// Reads the session cookie, or mints a new id and sets the cookie on the
/// way out.
pub async fn session_cookie(mut req: Request<Body>, next: Next) -> Response {
    let existing = cookie_value(req.headers(), SESSION_COOKIE)
        .filter(|value| uuid::Uuid::parse_str(value).is_ok());

    let (id, is_new) = match existing {
        Some(id) => (id, false),
        None => (uuid::Uuid::new_v4().to_string(), true),
    };

    req.extensions_mut().insert(SessionId(id.clone()));
    let mut response = next.run(req).await;

    if is_new {
        let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!("could not build session cookie: {e}"),
        }
    }

    response
}

/// Finds `name` across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for cookie in cookies {
            map.append(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        map
    }

    #[test]
    fn cookie_value_single() {
        let map = headers(&["webfm_session=abc"]);
        assert_eq!(cookie_value(&map, SESSION_COOKIE).as_deref(), Some("abc"));
    }

    #[test]
    fn cookie_value_among_others() {
        let map = headers(&["theme=dark; webfm_session=xyz; lang=en"]);
        assert_eq!(cookie_value(&map, SESSION_COOKIE).as_deref(), Some("xyz"));
    }

    #[test]
    fn cookie_value_across_headers() {
        let map = headers(&["theme=dark", "webfm_session=second"]);
        assert_eq!(
            cookie_value(&map, SESSION_COOKIE).as_deref(),
            Some("second")
        );
    }

    #[test]
    fn cookie_value_missing() {
        let map = headers(&["theme=dark", "webfm_sessionx=nope"]);
        assert_eq!(cookie_value(&map, SESSION_COOKIE), None);
        assert_eq!(cookie_value(&HeaderMap::new(), SESSION_COOKIE), None);
    }
}
