use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::foods::repo_types::{Food, FoodRating, FoodRow, ListType, SavedFood};

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<Food>> {
    let rows = sqlx::query_as::<_, FoodRow>(
        r#"
        SELECT id, name, alternate_names, description, food_type, labels,
               ingredients, nutrition_100g, ean_13, created_at, updated_at
          FROM foods
         ORDER BY id
         LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list foods")?;
    Ok(rows.into_iter().map(Food::from).collect())
}

pub async fn list_by_type(
    db: &PgPool,
    food_type: &str,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Food>> {
    let rows = sqlx::query_as::<_, FoodRow>(
        r#"
        SELECT id, name, alternate_names, description, food_type, labels,
               ingredients, nutrition_100g, ean_13, created_at, updated_at
          FROM foods
         WHERE food_type = $1
         ORDER BY id
         LIMIT $2 OFFSET $3
        "#,
    )
    .bind(food_type)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .with_context(|| format!("list foods by type {food_type}"))?;
    Ok(rows.into_iter().map(Food::from).collect())
}

/// Escape `LIKE` metacharacters so the term matches literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

pub async fn search(db: &PgPool, query: &str, limit: i64, offset: i64) -> anyhow::Result<Vec<Food>> {
    let rows = sqlx::query_as::<_, FoodRow>(
        r#"
        SELECT id, name, alternate_names, description, food_type, labels,
               ingredients, nutrition_100g, ean_13, created_at, updated_at
          FROM foods
         WHERE name ILIKE $1 ESCAPE '\'
         ORDER BY name, id
         LIMIT $2 OFFSET $3
        "#,
    )
    .bind(like_pattern(query))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("search foods")?;
    Ok(rows.into_iter().map(Food::from).collect())
}

pub async fn get_by_id(db: &PgPool, id: &str) -> anyhow::Result<Option<Food>> {
    let row = sqlx::query_as::<_, FoodRow>(
        r#"
        SELECT id, name, alternate_names, description, food_type, labels,
               ingredients, nutrition_100g, ean_13, created_at, updated_at
          FROM foods
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .with_context(|| format!("get food {id}"))?;
    Ok(row.map(Food::from))
}

// ---- Ratings ----

/// Insert or replace the caller's rating for a food.
pub async fn upsert_rating(
    db: &PgPool,
    user_id: Uuid,
    food_id: &str,
    rating: i16,
    comments: Option<&str>,
) -> anyhow::Result<FoodRating> {
    let row = sqlx::query_as::<_, FoodRating>(
        r#"
        INSERT INTO food_ratings (user_id, food_id, rating, comments)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, food_id)
        DO UPDATE SET rating = EXCLUDED.rating,
                      comments = EXCLUDED.comments,
                      updated_at = now()
        RETURNING id, user_id, food_id, rating, comments, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(food_id)
    .bind(rating)
    .bind(comments)
    .fetch_one(db)
    .await
    .context("upsert food rating")?;
    Ok(row)
}

pub async fn list_user_ratings(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<FoodRating>> {
    let rows = sqlx::query_as::<_, FoodRating>(
        r#"
        SELECT id, user_id, food_id, rating, comments, created_at, updated_at
          FROM food_ratings
         WHERE user_id = $1
         ORDER BY updated_at DESC
         LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list user ratings")?;
    Ok(rows)
}

/// Returns false when there was nothing to delete.
pub async fn delete_rating(db: &PgPool, user_id: Uuid, food_id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM food_ratings WHERE user_id = $1 AND food_id = $2")
        .bind(user_id)
        .bind(food_id)
        .execute(db)
        .await
        .context("delete food rating")?;
    Ok(res.rows_affected() > 0)
}

// ---- Saved foods ----

/// Returns `None` when the food is already on that list.
pub async fn save_food(
    db: &PgPool,
    user_id: Uuid,
    food_id: &str,
    list_type: ListType,
) -> anyhow::Result<Option<SavedFood>> {
    let row = sqlx::query_as::<_, SavedFood>(
        r#"
        INSERT INTO user_saved_foods (user_id, food_id, list_type)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, food_id, list_type) DO NOTHING
        RETURNING id, user_id, food_id, list_type, created_at
        "#,
    )
    .bind(user_id)
    .bind(food_id)
    .bind(list_type.as_str())
    .fetch_optional(db)
    .await
    .context("save food")?;
    Ok(row)
}

pub async fn list_saved_foods(
    db: &PgPool,
    user_id: Uuid,
    list_type: ListType,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<SavedFood>> {
    let rows = sqlx::query_as::<_, SavedFood>(
        r#"
        SELECT id, user_id, food_id, list_type, created_at
          FROM user_saved_foods
         WHERE user_id = $1 AND list_type = $2
         ORDER BY created_at DESC
         LIMIT $3 OFFSET $4
        "#,
    )
    .bind(user_id)
    .bind(list_type.as_str())
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list saved foods")?;
    Ok(rows)
}

pub async fn delete_saved_food(
    db: &PgPool,
    user_id: Uuid,
    food_id: &str,
    list_type: ListType,
) -> anyhow::Result<bool> {
    let res = sqlx::query(
        "DELETE FROM user_saved_foods WHERE user_id = $1 AND food_id = $2 AND list_type = $3",
    )
    .bind(user_id)
    .bind(food_id)
    .bind(list_type.as_str())
    .execute(db)
    .await
    .context("delete saved food")?;
    Ok(res.rows_affected() > 0)
}
