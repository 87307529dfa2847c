use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    extract::{AppPath, AppQuery, JsonOrDefault},
    foods::Food,
    recommendations::dto::{
        DaysQuery, LimitQuery, MealPlan, RecommendationQuery, RecommendationRequest,
        RecommendationResponse, DEFAULT_ALTERNATIVES, DEFAULT_DAILY,
    },
    state::AppState,
};

pub fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations", get(get_recommendations))
        .route("/recommendations/filter", post(filter_recommendations))
        .route("/recommendations/alternatives/:food_id", get(get_alternatives))
        .route("/recommendations/daily/:profile_id", get(get_daily))
        .route("/recommendations/meal-plan/:profile_id", get(get_meal_plan))
}

#[instrument(skip(state))]
pub async fn get_recommendations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppQuery(q): AppQuery<RecommendationQuery>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let resp = state.engine.get_recommendations(user_id, q.into()).await?;
    Ok(Json(resp))
}

#[instrument(skip(state, body))]
pub async fn filter_recommendations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: JsonOrDefault<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let JsonOrDefault(req) = body;
    let resp = state.engine.get_recommendations(user_id, req).await?;
    Ok(Json(resp))
}

#[instrument(skip(state))]
pub async fn get_alternatives(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(food_id): AppPath<String>,
    AppQuery(q): AppQuery<LimitQuery>,
) -> Result<Json<Vec<Food>>, AppError> {
    let limit = q.limit.unwrap_or(DEFAULT_ALTERNATIVES);
    let foods = state.engine.get_alternatives(user_id, &food_id, limit).await?;
    Ok(Json(foods))
}

#[instrument(skip(state))]
pub async fn get_daily(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(profile_id): AppPath<Uuid>,
    AppQuery(q): AppQuery<LimitQuery>,
) -> Result<Json<Vec<Food>>, AppError> {
    state.engine.owned_profile(user_id, profile_id).await?;
    let limit = q.limit.unwrap_or(DEFAULT_DAILY);
    let foods = state.engine.get_daily_recommendations(profile_id, limit).await?;
    Ok(Json(foods))
}

#[instrument(skip(state))]
pub async fn get_meal_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(profile_id): AppPath<Uuid>,
    AppQuery(q): AppQuery<DaysQuery>,
) -> Result<Json<MealPlan>, AppError> {
    state.engine.owned_profile(user_id, profile_id).await?;
    let plan = state.engine.get_meal_plan(profile_id, q.days()).await?;
    Ok(Json(plan))
}
