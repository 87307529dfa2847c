pub mod catalog;
mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
mod services;

use crate::state::AppState;
use axum::Router;

pub use catalog::{FoodCatalog, PgFoodCatalog};
pub use repo_types::Food;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::user_routes())
}
