pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub(crate) mod services;
pub mod store;

use crate::state::AppState;
use axum::Router;

pub use repo_types::Profile;
pub use store::{PgProfileStore, ProfileStore};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::profile_routes())
}
