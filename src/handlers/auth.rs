use axum::extract::State;
use axum::{Extension, Form};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::{self, password, Claims};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, TOKEN_COOKIE};
use crate::state::AppState;

/// OAuth2-style password form: urlencoded `username` and `password`.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /auth/token - Exchange credentials for a bearer token
///
/// The token is returned in the body and duplicated into an HttpOnly,
/// SameSite=Strict cookie so browser clients need no header handling.
/// Unknown usernames and wrong passwords get the same 401.
pub async fn token(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<TokenForm>,
) -> Result<(CookieJar, ApiResponse<TokenResponse>), ApiError> {
    let user = match state.users.find_by_username(&form.username).await? {
        Some(user) => user,
        None => return Err(ApiError::unauthorized("Incorrect username or password")),
    };

    let verified = password::verify_password(&form.password, &user.password_hash)
        .map_err(|e| {
            tracing::error!("password verification failed for {}: {}", user.username, e);
            ApiError::internal("An error occurred while processing your request")
        })?;
    if !verified {
        return Err(ApiError::unauthorized("Incorrect username or password"));
    }

    let claims = Claims::new(user.username.clone(), user.role.clone());
    let token = auth::generate_jwt(&claims).map_err(|e| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal("An error occurred while processing your request")
    })?;

    tracing::info!(username = %user.username, role = %user.role, "token issued");

    let cookie = Cookie::build((TOKEN_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();

    Ok((
        jar.add(cookie),
        ApiResponse::success(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
        }),
    ))
}

/// GET /auth/profile - The identity embedded in the presented token
pub async fn profile(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "username": user.username,
        "role": user.role,
    })))
}

/// GET /auth/dashboard - Admin-only landing
pub async fn dashboard(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    if !user.is_admin() {
        return Err(ApiError::forbidden("Not enough permissions"));
    }
    Ok(ApiResponse::success(json!({
        "message": format!("Welcome to the admin dashboard, {}!", user.username),
        "user": {
            "username": user.username,
            "role": user.role,
        },
    })))
}
