use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
        jwt::{AuthUser, JwtKeys},
        repo_types::User,
        services::{hash_password, is_valid_email, normalize_email, verify_password, MIN_PASSWORD_LEN},
    },
    error::{json_body, AppError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn issue_tokens(keys: &JwtKeys, user: User) -> Result<AuthResponse, AppError> {
    let access_token = keys.sign_access(user.id, user.role).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        AppError::Internal(e)
    })?;
    let refresh_token = keys.sign_refresh(user.id, user.role).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        AppError::Internal(e)
    })?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    })
}

#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let mut payload = json_body(body)?;
    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::Validation("Password too short".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;

    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let user = match User::create(&state.db, &payload.email, &hash, name).await {
        Ok(u) => u,
        Err(AppError::Conflict(msg)) => {
            warn!(email = %payload.email, "email taken by concurrent registration");
            return Err(AppError::Conflict(msg));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(e);
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    let keys = JwtKeys::from_ref(&state);
    Ok((StatusCode::CREATED, Json(issue_tokens(&keys, user)?)))
}

#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let mut payload = json_body(body)?;
    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err(AppError::Unauthenticated("Invalid credentials".into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(AppError::Internal(e));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthenticated("Invalid credentials".into()));
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    let keys = JwtKeys::from_ref(&state);
    Ok(Json(issue_tokens(&keys, user)?))
}

#[instrument(skip(state, body))]
pub async fn refresh(
    State(state): State<AppState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let payload = json_body(body)?;
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh token rejected");
        AppError::Unauthenticated("Invalid or expired token".into())
    })?;

    // Reload so the new pair carries the current role.
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("User not found".into()))?;

    Ok(Json(issue_tokens(&keys, user)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| {
            error!(user_id = %auth.user_id, "user not found");
            AppError::Unauthenticated("User not found".into())
        })?;

    Ok(Json(user.into()))
}
