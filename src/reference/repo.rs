use anyhow::Context;
use sqlx::PgPool;

use crate::reference::repo_types::{Allergen, AllergenRow, HealthCondition, HealthConditionRow};

pub async fn list_allergens(db: &PgPool) -> anyhow::Result<Vec<Allergen>> {
    let rows = sqlx::query_as::<_, AllergenRow>(
        r#"
        SELECT id, name, description, common_names, created_at
          FROM allergens
         ORDER BY name
        "#,
    )
    .fetch_all(db)
    .await
    .context("list allergens")?;
    Ok(rows.into_iter().map(Allergen::from).collect())
}

pub async fn list_health_conditions(db: &PgPool) -> anyhow::Result<Vec<HealthCondition>> {
    let rows = sqlx::query_as::<_, HealthConditionRow>(
        r#"
        SELECT id, name, description, nutrient_restrictions,
               nutrient_recommendations, created_at
          FROM health_conditions
         ORDER BY name
        "#,
    )
    .fetch_all(db)
    .await
    .context("list health conditions")?;
    Ok(rows.into_iter().map(HealthCondition::from).collect())
}
