use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;

#[derive(Debug, FromRow)]
pub struct AllergenRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub common_names: Json<BTreeMap<String, serde_json::Value>>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Allergen {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Locale or alias key -> alternative names for the allergen.
    pub common_names: BTreeMap<String, serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<AllergenRow> for Allergen {
    fn from(r: AllergenRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description.unwrap_or_default(),
            common_names: r.common_names.0,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct HealthConditionRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub nutrient_restrictions: Json<BTreeMap<String, serde_json::Value>>,
    pub nutrient_recommendations: Json<BTreeMap<String, serde_json::Value>>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCondition {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub nutrient_restrictions: BTreeMap<String, serde_json::Value>,
    pub nutrient_recommendations: BTreeMap<String, serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<HealthConditionRow> for HealthCondition {
    fn from(r: HealthConditionRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description.unwrap_or_default(),
            nutrient_restrictions: r.nutrient_restrictions.0,
            nutrient_recommendations: r.nutrient_recommendations.0,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DietaryPattern {
    pub name: &'static str,
    pub description: &'static str,
    pub restrictions: &'static [&'static str],
    pub recommendations: &'static [&'static str],
}

/// Patterns are fixed; they are not stored in the database.
pub const DIETARY_PATTERNS: &[DietaryPattern] = &[
    DietaryPattern {
        name: "vegetarian",
        description: "A diet that excludes meat and fish but includes other animal products",
        restrictions: &["meat", "fish", "seafood"],
        recommendations: &["legumes", "nuts", "seeds", "dairy", "eggs"],
    },
    DietaryPattern {
        name: "vegan",
        description: "A diet that excludes all animal products",
        restrictions: &["meat", "fish", "seafood", "dairy", "eggs", "honey"],
        recommendations: &["legumes", "nuts", "seeds", "whole_grains", "fruits", "vegetables"],
    },
    DietaryPattern {
        name: "pescatarian",
        description: "A diet that includes fish but excludes other meats",
        restrictions: &["meat", "poultry"],
        recommendations: &["fish", "seafood", "vegetables", "fruits", "whole_grains"],
    },
];
