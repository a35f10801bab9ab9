use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::{self, Claims};
use crate::error::ApiError;

/// Name of the cookie carrying the access token, mirrored by the login
/// endpoint when it sets the cookie.
pub const TOKEN_COOKIE: &str = "access_token";

/// Authenticated identity extracted from a verified token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            role: claims.role,
        }
    }
}

/// Token-verifying middleware for identity-gated routes.
///
/// The token may arrive as an `Authorization: Bearer` header or as the
/// `access_token` cookie set at login. Signature or expiry failures are
/// 401; the verified identity is injected into request extensions for
/// handlers to pick up.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&headers).ok_or_else(|| {
        ApiError::unauthorized("Missing credentials: provide a Bearer token or the access_token cookie")
    })?;

    let claims = auth::decode_jwt(&token).map_err(|e| {
        tracing::debug!("token rejected: {}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = bearer_from_headers(headers) {
        return Some(token);
    }
    CookieJar::from_headers(headers)
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
}

fn bearer_from_headers(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get("authorization")?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
