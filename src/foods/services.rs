use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::foods::{
    repo,
    repo_types::{Food, FoodRating, ListType, SavedFood},
};

pub(crate) fn validate_rating(rating: i16) -> Result<(), AppError> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::BadRequest("rating must be between 1 and 5".into()));
    }
    Ok(())
}

pub async fn require_food(db: &PgPool, food_id: &str) -> Result<Food, AppError> {
    repo::get_by_id(db, food_id)
        .await?
        .ok_or_else(|| AppError::NotFound("food not found".into()))
}

pub async fn rate_food(
    db: &PgPool,
    user_id: Uuid,
    food_id: &str,
    rating: i16,
    comments: Option<&str>,
) -> Result<FoodRating, AppError> {
    validate_rating(rating)?;
    require_food(db, food_id).await?;
    let saved = repo::upsert_rating(db, user_id, food_id, rating, comments).await?;
    info!(%user_id, food_id, rating, "food rated");
    Ok(saved)
}

pub async fn delete_rating(db: &PgPool, user_id: Uuid, food_id: &str) -> Result<(), AppError> {
    if !repo::delete_rating(db, user_id, food_id).await? {
        return Err(AppError::NotFound("rating not found".into()));
    }
    Ok(())
}

pub async fn save_food(
    db: &PgPool,
    user_id: Uuid,
    food_id: &str,
    list_type: ListType,
) -> Result<SavedFood, AppError> {
    require_food(db, food_id).await?;
    let saved = repo::save_food(db, user_id, food_id, list_type)
        .await?
        .ok_or_else(|| AppError::Conflict("food already saved to this list".into()))?;
    info!(%user_id, food_id, list_type = list_type.as_str(), "food saved");
    Ok(saved)
}

pub async fn remove_saved_food(
    db: &PgPool,
    user_id: Uuid,
    food_id: &str,
    list_type: ListType,
) -> Result<(), AppError> {
    if !repo::delete_saved_food(db, user_id, food_id, list_type).await? {
        return Err(AppError::NotFound("saved food not found".into()));
    }
    Ok(())
}
