use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    extract::{AppJson, AppPath, AppQuery, JsonOrDefault},
    foods::{
        dto::{normalize_page, FoodPage, ListTypeBody, Pagination, RateFoodRequest, SavedQuery, SearchQuery},
        repo,
        repo_types::{Food, FoodRating, SavedFood},
        services,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(search_foods))
        .route("/foods/:id", get(get_food))
        .route("/foods/category/:category", get(list_by_category))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/foods/ratings", get(list_ratings))
        .route("/foods/saved", get(list_saved))
        .route("/foods/:id/rating", post(rate_food).delete(delete_rating))
        .route("/foods/:id/save", post(save_food).delete(remove_saved_food))
}

#[instrument(skip(state))]
pub async fn search_foods(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    AppQuery(q): AppQuery<SearchQuery>,
) -> Result<Json<FoodPage>, AppError> {
    let (limit, offset) = normalize_page(q.limit, q.offset);
    let foods = match q.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(term) => repo::search(&state.db, term, limit, offset).await?,
        None => repo::list(&state.db, limit, offset).await?,
    };
    Ok(Json(FoodPage { foods, limit, offset }))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    AppPath(id): AppPath<String>,
) -> Result<Json<Food>, AppError> {
    let food = services::require_food(&state.db, &id).await?;
    Ok(Json(food))
}

#[instrument(skip(state))]
pub async fn list_by_category(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    AppPath(category): AppPath<String>,
    AppQuery(p): AppQuery<Pagination>,
) -> Result<Json<FoodPage>, AppError> {
    let (limit, offset) = p.normalized();
    let foods = repo::list_by_type(&state.db, &category, limit, offset).await?;
    Ok(Json(FoodPage { foods, limit, offset }))
}

#[instrument(skip(state, body))]
pub async fn rate_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<String>,
    AppJson(body): AppJson<RateFoodRequest>,
) -> Result<Json<FoodRating>, AppError> {
    let rating =
        services::rate_food(&state.db, user_id, &id, body.rating, body.comments.as_deref()).await?;
    Ok(Json(rating))
}

#[instrument(skip(state))]
pub async fn delete_rating(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<String>,
) -> Result<StatusCode, AppError> {
    services::delete_rating(&state.db, user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_ratings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppQuery(p): AppQuery<Pagination>,
) -> Result<Json<Vec<FoodRating>>, AppError> {
    let (limit, offset) = p.normalized();
    let ratings = repo::list_user_ratings(&state.db, user_id, limit, offset).await?;
    Ok(Json(ratings))
}

#[instrument(skip(state, body))]
pub async fn save_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<String>,
    JsonOrDefault(body): JsonOrDefault<ListTypeBody>,
) -> Result<(StatusCode, Json<SavedFood>), AppError> {
    let list_type = body.list_type;
    let saved = services::save_food(&state.db, user_id, &id, list_type).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

#[instrument(skip(state))]
pub async fn remove_saved_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<String>,
    AppQuery(body): AppQuery<ListTypeBody>,
) -> Result<StatusCode, AppError> {
    services::remove_saved_food(&state.db, user_id, &id, body.list_type).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_saved(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppQuery(q): AppQuery<SavedQuery>,
) -> Result<Json<Vec<SavedFood>>, AppError> {
    let (limit, offset) = normalize_page(q.limit, q.offset);
    let saved = repo::list_saved_foods(&state.db, user_id, q.list_type, limit, offset).await?;
    Ok(Json(saved))
}
