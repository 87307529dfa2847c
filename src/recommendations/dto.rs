use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::foods::Food;
use crate::recommendations::rules::Rule;

pub const DEFAULT_ALTERNATIVES: i64 = 5;
pub const DEFAULT_DAILY: i64 = 5;
pub const DEFAULT_PLAN_DAYS: u32 = 7;
pub const MAX_PLAN_DAYS: u32 = 30;

/// Body of `POST /recommendations/filter`. A limit of 0 means "use the default".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecommendationRequest {
    pub profile_id: Option<Uuid>,
    pub custom_rules: Vec<Rule>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub foods: Vec<Food>,
    pub total_count: usize,
    pub applied_rules: Vec<Rule>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    pub profile_id: Option<Uuid>,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl From<RecommendationQuery> for RecommendationRequest {
    fn from(q: RecommendationQuery) -> Self {
        Self {
            profile_id: q.profile_id,
            custom_rules: Vec::new(),
            limit: q.limit,
            offset: q.offset,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub days: Option<u32>,
}

impl DaysQuery {
    pub fn days(&self) -> u32 {
        self.days.unwrap_or(DEFAULT_PLAN_DAYS).min(MAX_PLAN_DAYS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Meal {
    #[serde(rename = "type")]
    pub slot: MealSlot,
    pub foods: Vec<Food>,
}

#[derive(Debug, Serialize)]
pub struct DailyPlan {
    pub date: String,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Serialize)]
pub struct MealPlan {
    pub profile_id: Uuid,
    pub days: Vec<DailyPlan>,
    pub total_days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_fields_are_optional() {
        let req: RecommendationRequest = serde_json::from_str("{}").unwrap();
        assert!(req.profile_id.is_none());
        assert!(req.custom_rules.is_empty());
        assert_eq!((req.limit, req.offset), (0, 0));
    }

    #[test]
    fn plan_days_default_and_cap() {
        assert_eq!(DaysQuery { days: None }.days(), 7);
        assert_eq!(DaysQuery { days: Some(3) }.days(), 3);
        assert_eq!(DaysQuery { days: Some(365) }.days(), 30);
    }

    #[test]
    fn meal_serializes_slot_as_type() {
        let meal = Meal { slot: MealSlot::Lunch, foods: Vec::new() };
        let v = serde_json::to_value(&meal).unwrap();
        assert_eq!(v["type"], "lunch");
    }
}
