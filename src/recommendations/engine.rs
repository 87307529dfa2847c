use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::foods::{Food, FoodCatalog};
use crate::profiles::{services::ensure_owner, Profile, ProfileStore};
use crate::recommendations::{
    dto::{DailyPlan, Meal, MealPlan, MealSlot, RecommendationRequest, RecommendationResponse},
    evaluator::{accepts_ordered, sort_by_priority},
    rules::{generate_rules, Rule, RuleOperation, RuleType, MEAL_TYPE_PRIORITY},
};

/// Foods requested per meal slot in a meal plan.
pub const FOODS_PER_MEAL: i64 = 3;

/// Stateless recommendation service over read-only catalog and profile stores.
#[derive(Clone)]
pub struct RecommendationEngine {
    foods: Arc<dyn FoodCatalog>,
    profiles: Arc<dyn ProfileStore>,
    default_limit: i64,
}

impl RecommendationEngine {
    pub fn new(foods: Arc<dyn FoodCatalog>, profiles: Arc<dyn ProfileStore>, default_limit: i64) -> Self {
        Self {
            foods,
            profiles,
            default_limit,
        }
    }

    /// Filter one catalog page against the caller's profile.
    ///
    /// `total_count` is the number of accepted foods in the fetched page, not
    /// across the whole catalog.
    pub async fn get_recommendations(
        &self,
        user_id: Uuid,
        req: RecommendationRequest,
    ) -> Result<RecommendationResponse, AppError> {
        let profile = self.resolve_profile(user_id, req.profile_id).await?;

        let mut rules = self.generate_rules_from_profile(&profile)?;
        rules.extend(req.custom_rules);
        sort_by_priority(&mut rules);

        let limit = if req.limit > 0 { req.limit } else { self.default_limit };
        let offset = req.offset.max(0);
        let page = self
            .foods
            .list(limit, offset)
            .await
            .context("fetch catalog page")?;

        let fetched = page.len();
        let foods: Vec<Food> = page
            .into_iter()
            .filter(|f| accepts_ordered(f, &rules))
            .collect();

        debug!(
            %user_id,
            profile_id = %profile.id,
            rules = rules.len(),
            fetched,
            accepted = foods.len(),
            "recommendations filtered"
        );

        Ok(RecommendationResponse {
            total_count: foods.len(),
            foods,
            applied_rules: rules,
        })
    }

    /// Foods of the same type as `food_id`, excluding it. No rule filtering.
    pub async fn get_alternatives(
        &self,
        user_id: Uuid,
        food_id: &str,
        limit: i64,
    ) -> Result<Vec<Food>, AppError> {
        let limit = limit.max(0);
        let source = self
            .foods
            .get_by_id(food_id)
            .await?
            .ok_or_else(|| AppError::NotFound("food not found".into()))?;

        let Some(food_type) = source.food_type.as_deref() else {
            debug!(%user_id, food_id, "source food has no type; no alternatives");
            return Ok(Vec::new());
        };

        let candidates = self
            .foods
            .list_by_type(food_type, limit.saturating_add(1), 0)
            .await
            .with_context(|| format!("list alternatives of type {food_type}"))?;

        let alternatives: Vec<Food> = candidates
            .into_iter()
            .filter(|f| f.id != source.id)
            .take(usize::try_from(limit).unwrap_or(0))
            .collect();

        debug!(%user_id, food_id, food_type, found = alternatives.len(), "alternatives listed");
        Ok(alternatives)
    }

    /// Breakfast, lunch and dinner picks for `days` consecutive days.
    pub async fn get_meal_plan(&self, profile_id: Uuid, days: u32) -> Result<MealPlan, AppError> {
        let profile = self.require_profile(profile_id).await?;

        let mut plan = MealPlan {
            profile_id,
            days: Vec::with_capacity(days as usize),
            total_days: days,
        };

        for day in 1..=days {
            let mut meals = Vec::with_capacity(MealSlot::ALL.len());
            for slot in MealSlot::ALL {
                let req = RecommendationRequest {
                    profile_id: Some(profile_id),
                    custom_rules: vec![Rule::new(
                        RuleType::MealType,
                        RuleOperation::Include,
                        slot.as_str(),
                        MEAL_TYPE_PRIORITY,
                    )],
                    limit: FOODS_PER_MEAL,
                    offset: 0,
                };
                let resp = self.get_recommendations(profile.user_id, req).await?;
                meals.push(Meal {
                    slot,
                    foods: resp.foods,
                });
            }
            plan.days.push(DailyPlan {
                date: format!("Day {day}"),
                meals,
            });
        }

        info!(%profile_id, days, "meal plan composed");
        Ok(plan)
    }

    /// Recommendations for a profile's owner using that profile.
    pub async fn get_daily_recommendations(
        &self,
        profile_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Food>, AppError> {
        let profile = self.require_profile(profile_id).await?;
        let req = RecommendationRequest {
            profile_id: Some(profile_id),
            custom_rules: Vec::new(),
            limit,
            offset: 0,
        };
        Ok(self.get_recommendations(profile.user_id, req).await?.foods)
    }

    /// Exposed for introspection; generation itself cannot fail.
    pub fn generate_rules_from_profile(&self, profile: &Profile) -> Result<Vec<Rule>, AppError> {
        Ok(generate_rules(profile))
    }

    /// Load a profile and check that `user_id` owns it.
    pub async fn owned_profile(&self, user_id: Uuid, profile_id: Uuid) -> Result<Profile, AppError> {
        let profile = self.require_profile(profile_id).await?;
        ensure_owner(&profile, user_id)?;
        Ok(profile)
    }

    async fn resolve_profile(&self, user_id: Uuid, profile_id: Option<Uuid>) -> Result<Profile, AppError> {
        match profile_id {
            Some(id) => self.owned_profile(user_id, id).await,
            None => self
                .profiles
                .get_default_by_user_id(user_id)
                .await?
                .ok_or_else(|| AppError::NotFound("default profile not found".into())),
        }
    }

    async fn require_profile(&self, profile_id: Uuid) -> Result<Profile, AppError> {
        self.profiles
            .get_by_id(profile_id)
            .await?
            .ok_or_else(|| AppError::NotFound("profile not found".into()))
    }
}
