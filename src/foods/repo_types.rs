use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

/// Food record as stored in the `foods` table.
#[derive(Debug, FromRow)]
pub struct FoodRow {
    pub id: String,
    pub name: String,
    pub alternate_names: Json<Vec<String>>,
    pub description: Option<String>,
    pub food_type: Option<String>,
    pub labels: Json<Vec<String>>,
    pub ingredients: Option<String>,
    pub nutrition_100g: Json<BTreeMap<String, serde_json::Value>>,
    pub ean_13: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Catalog food item. Read-only for the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub alternate_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_type: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    /// Nutrient name -> value per 100g. Values are numbers or numeric strings.
    #[serde(default)]
    pub nutrition_100g: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ean_13: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<FoodRow> for Food {
    fn from(r: FoodRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            alternate_names: r.alternate_names.0,
            description: r.description,
            food_type: r.food_type,
            labels: r.labels.0,
            ingredients: r.ingredients,
            nutrition_100g: r.nutrition_100g.0,
            ean_13: r.ean_13,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FoodRating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: String,
    pub rating: i16,
    pub comments: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SavedFood {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: String,
    pub list_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Named lists a user can save foods into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    #[default]
    Favorites,
    ShoppingList,
    WatchList,
}

impl ListType {
    pub fn as_str(self) -> &'static str {
        match self {
            ListType::Favorites => "favorites",
            ListType::ShoppingList => "shopping_list",
            ListType::WatchList => "watch_list",
        }
    }
}
