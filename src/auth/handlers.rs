use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        claims::Claims,
        dto::{
            normalize_email, AuthResponse, ChangePasswordRequest, LoginRequest, PublicUser,
            RefreshRequest, RegisterRequest, UpdateUserRequest,
        },
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo,
    },
    error::AppError,
    extract::AppJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/me/password", put(change_password))
}

fn issue_pair(keys: &JwtKeys, user_id: Uuid) -> Result<(String, String), AppError> {
    Ok((keys.sign_access(user_id)?, keys.sign_refresh(user_id)?))
}

fn verified_refresh(keys: &JwtKeys, token: &str) -> Result<Claims, AppError> {
    keys.verify_refresh(token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Unauthorized("invalid refresh token".into())
    })
}

/// A refresh token is good for one use; a second revocation means reuse.
async fn revoke(db: &PgPool, claims: &Claims) -> Result<(), AppError> {
    let expires_at = OffsetDateTime::from_unix_timestamp(claims.exp as i64)
        .context("refresh token expiry out of range")?;
    if !repo::revoke_token(db, claims.jti, claims.sub, expires_at).await? {
        warn!(user_id = %claims.sub, jti = %claims.jti, "revoked refresh token presented");
        return Err(AppError::Unauthorized("refresh token revoked".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let payload = payload.validated()?;
    let hash = hash_password(&payload.password)?;

    let user = repo::create(
        &state.db,
        &payload.email,
        &hash,
        &payload.first_name,
        &payload.last_name,
    )
    .await?
    .ok_or_else(|| {
        warn!(email = %payload.email, "email already registered");
        AppError::Conflict("email already registered".into())
    })?;

    let (access_token, refresh_token) = issue_pair(&JwtKeys::from_ref(&state), user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token,
            refresh_token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = normalize_email(&payload.email)?;
    let invalid = || AppError::Unauthorized("invalid credentials".into());

    let Some(mut user) = repo::find_by_email(&state.db, &email).await? else {
        warn!(%email, "login unknown email");
        return Err(invalid());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(%email, user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    repo::touch_last_login(&state.db, user.id).await?;
    user.last_login = Some(time::OffsetDateTime::now_utc());

    let (access_token, refresh_token) = issue_pair(&JwtKeys::from_ref(&state), user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = verified_refresh(&keys, &payload.refresh_token)?;

    let user = repo::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("user not found".into()))?;

    revoke(&state.db, &claims).await?;
    let (access_token, refresh_token) = issue_pair(&keys, user.id)?;
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn logout(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RefreshRequest>,
) -> Result<StatusCode, AppError> {
    let claims = verified_refresh(&JwtKeys::from_ref(&state), &payload.refresh_token)?;
    revoke(&state.db, &claims).await?;
    info!(user_id = %claims.sub, "user logged out");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<PublicUser>, AppError> {
    let not_found = || AppError::NotFound("user not found".into());
    let current = repo::find_by_id(&state.db, user_id).await?.ok_or_else(not_found)?;
    let payload = payload.validated(&current.email)?;

    let user = repo::update_names(
        &state.db,
        user_id,
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
    )
    .await?
    .ok_or_else(not_found)?;

    info!(%user_id, "user updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    let payload = payload.validated()?;
    let user = repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;

    if !verify_password(&payload.current_password, &user.password_hash)? {
        warn!(%user_id, "password change with wrong current password");
        return Err(AppError::Unauthorized("current password is incorrect".into()));
    }

    let hash = hash_password(&payload.new_password)?;
    repo::update_password(&state.db, user_id, &hash).await?;
    info!(%user_id, "password changed");
    Ok(StatusCode::NO_CONTENT)
}
