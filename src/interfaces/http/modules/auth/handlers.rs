//! Authentication HTTP handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::info;
use uuid::Uuid;

use crate::domain::{RepositoryProvider, User};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::interfaces::http::common::{error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::Clock;

use super::dto::{LoginRequest, LoginResponse, SignupRequest, UserInfo};

/// Application state for auth handlers
#[derive(Clone)]
pub struct AuthAppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub jwt_config: JwtConfig,
    pub clock: Arc<dyn Clock>,
}

fn user_info(user: &User) -> UserInfo {
    UserInfo {
        id: user.id.clone(),
        username: user.username.clone(),
        email: user.email.clone(),
    }
}

fn token_response(
    user: &User,
    jwt_config: &JwtConfig,
) -> Result<LoginResponse, (StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let token = create_token(&user.id, &user.username, jwt_config).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;
    Ok(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: jwt_config.expiration_hours * 3600,
        user: user_info(user),
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created, token issued", body = ApiResponse<LoginResponse>),
        (status = 409, description = "Username or email already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn signup(
    State(state): State<AuthAppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<LoginResponse>>),
    (StatusCode, Json<ApiResponse<LoginResponse>>),
> {
    for login in [&request.username, &request.email] {
        let existing = state
            .repos
            .users()
            .find_by_username_or_email(login)
            .await
            .map_err(|e| error_response(&e))?;
        if existing.is_some() {
            return Err((
                StatusCode::CONFLICT,
                Json(ApiResponse::error("Username or email already exists")),
            ));
        }
    }

    let password_hash = hash_password(&request.password).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let now = state.clock.now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        username: request.username,
        email: request.email,
        password_hash,
        is_active: true,
        created_at: now,
        updated_at: now,
        last_login_at: Some(now),
    };
    state
        .repos
        .users()
        .insert(user.clone())
        .await
        .map_err(|e| error_response(&e))?;

    info!(user_id = %user.id, username = %user.username, "user signed up");

    // Signup logs the new account straight in
    let response = token_response(&user, &state.jwt_config)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthAppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let user = state
        .repos
        .users()
        .find_by_username_or_email(&request.username)
        .await
        .map_err(|e| error_response(&e))?;

    let Some(user) = user else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid credentials")),
        ));
    };

    if !user.is_active {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Account is disabled")),
        ));
    }

    let password_valid = verify_password(&request.password, &user.password_hash).unwrap_or(false);
    if !password_valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid credentials")),
        ));
    }

    // Best effort; a failed timestamp write must not fail the login
    let _ = state
        .repos
        .users()
        .touch_last_login(&user.id, state.clock.now())
        .await;

    let response = token_response(&user, &state.jwt_config)?;
    Ok(Json(ApiResponse::success(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn me(
    State(state): State<AuthAppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserInfo>>, (StatusCode, Json<ApiResponse<UserInfo>>)> {
    let user = state
        .repos
        .users()
        .find_by_id(&auth.user_id)
        .await
        .map_err(|e| error_response(&e))?;

    let Some(user) = user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ));
    };

    Ok(Json(ApiResponse::success(user_info(&user))))
}
