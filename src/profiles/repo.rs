use anyhow::Context;
use sqlx::{types::Json, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::profiles::{
    dto::ProfileInput,
    repo_types::{Profile, ProfileRow},
};

pub async fn get_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Profile>> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT id, user_id, profile_name, is_default, health_conditions,
               dietary_restrictions, allergens, goal_type, calorie_target,
               macronutrient_preference, disliked_foods, preferred_foods,
               cuisine_preferences, created_at, updated_at
          FROM user_profiles
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .with_context(|| format!("get profile {id}"))?;
    Ok(row.map(Profile::from))
}

pub async fn get_default_by_user_id(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT id, user_id, profile_name, is_default, health_conditions,
               dietary_restrictions, allergens, goal_type, calorie_target,
               macronutrient_preference, disliked_foods, preferred_foods,
               cuisine_preferences, created_at, updated_at
          FROM user_profiles
         WHERE user_id = $1 AND is_default
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    .with_context(|| format!("get default profile for user {user_id}"))?;
    Ok(row.map(Profile::from))
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Profile>> {
    let rows = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT id, user_id, profile_name, is_default, health_conditions,
               dietary_restrictions, allergens, goal_type, calorie_target,
               macronutrient_preference, disliked_foods, preferred_foods,
               cuisine_preferences, created_at, updated_at
          FROM user_profiles
         WHERE user_id = $1
         ORDER BY is_default DESC, created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list profiles by user")?;
    Ok(rows.into_iter().map(Profile::from).collect())
}

/// Clear the default flag on every profile of the user except `keep`.
async fn clear_defaults_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    keep: Option<Uuid>,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE user_profiles
           SET is_default = FALSE, updated_at = now()
         WHERE user_id = $1 AND is_default AND ($2::uuid IS NULL OR id <> $2)
        "#,
    )
    .bind(user_id)
    .bind(keep)
    .execute(&mut **tx)
    .await
    .context("clear default profiles")?;
    Ok(())
}

pub async fn create(db: &PgPool, user_id: Uuid, input: &ProfileInput) -> anyhow::Result<Profile> {
    let mut tx = db.begin().await.context("begin tx")?;
    if input.is_default {
        clear_defaults_tx(&mut tx, user_id, None).await?;
    }

    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO user_profiles (
            user_id, profile_name, is_default, health_conditions, dietary_restrictions,
            allergens, goal_type, calorie_target, macronutrient_preference,
            disliked_foods, preferred_foods, cuisine_preferences
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id, user_id, profile_name, is_default, health_conditions,
                  dietary_restrictions, allergens, goal_type, calorie_target,
                  macronutrient_preference, disliked_foods, preferred_foods,
                  cuisine_preferences, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(&input.profile_name)
    .bind(input.is_default)
    .bind(Json(&input.health_conditions))
    .bind(Json(&input.dietary_restrictions))
    .bind(Json(&input.allergens))
    .bind(&input.goal_type)
    .bind(input.calorie_target)
    .bind(&input.macronutrient_preference)
    .bind(Json(&input.disliked_foods))
    .bind(Json(&input.preferred_foods))
    .bind(Json(&input.cuisine_preferences))
    .fetch_one(&mut *tx)
    .await
    .context("insert profile")?;

    tx.commit().await.context("commit tx")?;
    Ok(row.into())
}

/// Replace the mutable fields of a profile owned by `user_id`.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    input: &ProfileInput,
) -> anyhow::Result<Option<Profile>> {
    let mut tx = db.begin().await.context("begin tx")?;
    if input.is_default {
        clear_defaults_tx(&mut tx, user_id, Some(id)).await?;
    }

    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE user_profiles
           SET profile_name = $3,
               is_default = $4,
               health_conditions = $5,
               dietary_restrictions = $6,
               allergens = $7,
               goal_type = $8,
               calorie_target = $9,
               macronutrient_preference = $10,
               disliked_foods = $11,
               preferred_foods = $12,
               cuisine_preferences = $13,
               updated_at = now()
         WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, profile_name, is_default, health_conditions,
                  dietary_restrictions, allergens, goal_type, calorie_target,
                  macronutrient_preference, disliked_foods, preferred_foods,
                  cuisine_preferences, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&input.profile_name)
    .bind(input.is_default)
    .bind(Json(&input.health_conditions))
    .bind(Json(&input.dietary_restrictions))
    .bind(Json(&input.allergens))
    .bind(&input.goal_type)
    .bind(input.calorie_target)
    .bind(&input.macronutrient_preference)
    .bind(Json(&input.disliked_foods))
    .bind(Json(&input.preferred_foods))
    .bind(Json(&input.cuisine_preferences))
    .fetch_optional(&mut *tx)
    .await
    .context("update profile")?;

    tx.commit().await.context("commit tx")?;
    Ok(row.map(Profile::from))
}

pub async fn set_default(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
    let mut tx = db.begin().await.context("begin tx")?;
    clear_defaults_tx(&mut tx, user_id, Some(id)).await?;
    let res = sqlx::query(
        r#"
        UPDATE user_profiles
           SET is_default = TRUE, updated_at = now()
         WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .context("set default profile")?;
    tx.commit().await.context("commit tx")?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM user_profiles WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete profile")?;
    Ok(res.rows_affected() > 0)
}
