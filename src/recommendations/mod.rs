pub mod dto;
pub mod engine;
pub mod evaluator;
pub mod handlers;
pub mod rules;

use crate::state::AppState;
use axum::Router;

pub use engine::RecommendationEngine;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::recommendation_routes())
}
