use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub profile_name: String,
    pub is_default: bool,
    pub health_conditions: Json<Vec<String>>,
    pub dietary_restrictions: Json<Vec<String>>,
    pub allergens: Json<Vec<String>>,
    pub goal_type: Option<String>,
    pub calorie_target: Option<i32>,
    pub macronutrient_preference: Option<String>,
    pub disliked_foods: Json<Vec<String>>,
    pub preferred_foods: Json<Vec<String>>,
    pub cuisine_preferences: Json<Vec<String>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A user's nutrition profile; the input to rule generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub profile_name: String,
    pub is_default: bool,
    pub health_conditions: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub allergens: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calorie_target: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macronutrient_preference: Option<String>,
    pub disliked_foods: Vec<String>,
    pub preferred_foods: Vec<String>,
    pub cuisine_preferences: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<ProfileRow> for Profile {
    fn from(r: ProfileRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            profile_name: r.profile_name,
            is_default: r.is_default,
            health_conditions: r.health_conditions.0,
            dietary_restrictions: r.dietary_restrictions.0,
            allergens: r.allergens.0,
            goal_type: r.goal_type,
            calorie_target: r.calorie_target,
            macronutrient_preference: r.macronutrient_preference,
            disliked_foods: r.disliked_foods.0,
            preferred_foods: r.preferred_foods.0,
            cuisine_preferences: r.cuisine_preferences.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
