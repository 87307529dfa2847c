use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    error::AppError,
    reference::{
        repo,
        repo_types::{Allergen, DietaryPattern, HealthCondition, DIETARY_PATTERNS},
    },
    state::AppState,
};

/// Lookup lists used to fill in profiles. No token required.
pub fn reference_routes() -> Router<AppState> {
    Router::new()
        .route("/reference/allergens", get(list_allergens))
        .route("/reference/health-conditions", get(list_health_conditions))
        .route("/reference/dietary-patterns", get(list_dietary_patterns))
}

#[instrument(skip(state))]
pub async fn list_allergens(State(state): State<AppState>) -> Result<Json<Vec<Allergen>>, AppError> {
    Ok(Json(repo::list_allergens(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn list_health_conditions(
    State(state): State<AppState>,
) -> Result<Json<Vec<HealthCondition>>, AppError> {
    Ok(Json(repo::list_health_conditions(&state.db).await?))
}

pub async fn list_dietary_patterns() -> Json<&'static [DietaryPattern]> {
    Json(DIETARY_PATTERNS)
}
