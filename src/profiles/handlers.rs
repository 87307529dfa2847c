use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    extract::{AppJson, AppPath},
    profiles::{dto::ProfileInput, repo, repo_types::Profile, services},
    recommendations::rules::Rule,
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profiles", get(list_profiles).post(create_profile))
        .route(
            "/profiles/:id",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route("/profiles/:id/default", post(set_default_profile))
        .route("/profiles/:id/rules", get(profile_rules))
}

#[instrument(skip(state))]
pub async fn list_profiles(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Profile>>, AppError> {
    let profiles = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(profiles))
}

#[instrument(skip(state, body))]
pub async fn create_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(body): AppJson<ProfileInput>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let profile = services::create(&state.db, user_id, body).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Profile>, AppError> {
    let profile = services::get_owned(&state.db, id, user_id).await?;
    Ok(Json(profile))
}

#[instrument(skip(state, body))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<ProfileInput>,
) -> Result<Json<Profile>, AppError> {
    let profile = services::update(&state.db, id, user_id, body).await?;
    Ok(Json(profile))
}

#[instrument(skip(state))]
pub async fn delete_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    services::delete(&state.db, id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn set_default_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    services::set_default(&state.db, id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Rules the engine would derive from this profile.
#[instrument(skip(state))]
pub async fn profile_rules(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Vec<Rule>>, AppError> {
    let profile = services::get_owned(&state.db, id, user_id).await?;
    Ok(Json(state.engine.generate_rules_from_profile(&profile)?))
}
