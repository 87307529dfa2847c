//! Rule model and profile-to-rule generation.
//!
//! Priorities are fixed constants; higher priorities are evaluated first and
//! rules with equal priority keep the order in which they were generated.

use serde::{Deserialize, Serialize};

use crate::profiles::Profile;

pub const ALLERGEN_PRIORITY: i32 = 100;
pub const DIETARY_PRIORITY: i32 = 90;
pub const CALORIE_PRIORITY: i32 = 70;
pub const PREFERRED_PRIORITY: i32 = 60;
pub const DISLIKED_PRIORITY: i32 = 50;
pub const CUISINE_PRIORITY: i32 = 40;

/// Priority of the synthetic meal-slot rule added by meal plans.
pub const MEAL_TYPE_PRIORITY: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Allergen,
    Dietary,
    Preference,
    Nutrient,
    Cuisine,
    MealType,
    /// Any unrecognized type; rules of this type never match.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleOperation {
    Exclude,
    Include,
    Max,
    Min,
    Prefer,
    #[serde(other)]
    Unknown,
}

/// A filter or ranking directive. Generated per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "type")]
    pub kind: RuleType,
    pub operation: RuleOperation,
    pub target: String,
    /// Threshold for `max`/`min`. Anything but a JSON number is non-binding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub priority: i32,
}

impl Rule {
    pub fn new(
        kind: RuleType,
        operation: RuleOperation,
        target: impl Into<String>,
        priority: i32,
    ) -> Self {
        Self {
            kind,
            operation,
            target: target.into(),
            value: None,
            priority,
        }
    }

    pub fn with_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Derive the rule set for a profile. Pure and deterministic.
pub fn generate_rules(profile: &Profile) -> Vec<Rule> {
    let mut rules = Vec::with_capacity(
        profile.allergens.len()
            + profile.dietary_restrictions.len()
            + profile.preferred_foods.len()
            + profile.disliked_foods.len()
            + profile.cuisine_preferences.len()
            + 1,
    );

    rules.extend(profile.allergens.iter().map(|a| {
        Rule::new(RuleType::Allergen, RuleOperation::Exclude, a, ALLERGEN_PRIORITY)
    }));

    rules.extend(profile.dietary_restrictions.iter().map(|d| {
        Rule::new(RuleType::Dietary, RuleOperation::Exclude, d, DIETARY_PRIORITY)
    }));

    if let Some(target) = profile.calorie_target.filter(|t| *t > 0) {
        rules.push(
            Rule::new(RuleType::Nutrient, RuleOperation::Max, "calories", CALORIE_PRIORITY)
                .with_value(target),
        );
    }

    rules.extend(profile.preferred_foods.iter().map(|p| {
        Rule::new(RuleType::Preference, RuleOperation::Include, p, PREFERRED_PRIORITY)
    }));

    rules.extend(profile.disliked_foods.iter().map(|d| {
        Rule::new(RuleType::Preference, RuleOperation::Exclude, d, DISLIKED_PRIORITY)
    }));

    rules.extend(profile.cuisine_preferences.iter().map(|c| {
        Rule::new(RuleType::Cuisine, RuleOperation::Prefer, c, CUISINE_PRIORITY)
    }));

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::profile;
    use uuid::Uuid;

    #[test]
    fn empty_profile_yields_no_rules() {
        let p = profile(Uuid::new_v4());
        assert!(generate_rules(&p).is_empty());
    }

    #[test]
    fn allergen_becomes_priority_100_exclude() {
        let mut p = profile(Uuid::new_v4());
        p.allergens = vec!["peanuts".into()];
        let rules = generate_rules(&p);
        assert_eq!(
            rules,
            vec![Rule::new(RuleType::Allergen, RuleOperation::Exclude, "peanuts", 100)]
        );
    }

    #[test]
    fn calorie_target_becomes_max_rule() {
        let mut p = profile(Uuid::new_v4());
        p.calorie_target = Some(400);
        let rules = generate_rules(&p);
        assert_eq!(rules.len(), 1);
        let r = &rules[0];
        assert_eq!(r.kind, RuleType::Nutrient);
        assert_eq!(r.operation, RuleOperation::Max);
        assert_eq!(r.target, "calories");
        assert_eq!(r.value, Some(serde_json::json!(400)));
        assert_eq!(r.priority, 70);
    }

    #[test]
    fn zero_calorie_target_is_ignored() {
        let mut p = profile(Uuid::new_v4());
        p.calorie_target = Some(0);
        assert!(generate_rules(&p).is_empty());
    }

    #[test]
    fn full_profile_follows_generation_table() {
        let mut p = profile(Uuid::new_v4());
        p.allergens = vec!["peanuts".into(), "shellfish".into()];
        p.dietary_restrictions = vec!["meat".into()];
        p.calorie_target = Some(2000);
        p.preferred_foods = vec!["oats".into()];
        p.disliked_foods = vec!["liver".into()];
        p.cuisine_preferences = vec!["thai".into()];

        use RuleOperation::*;
        use RuleType::*;
        assert_eq!(
            generate_rules(&p),
            vec![
                Rule::new(Allergen, Exclude, "peanuts", 100),
                Rule::new(Allergen, Exclude, "shellfish", 100),
                Rule::new(Dietary, Exclude, "meat", 90),
                Rule::new(Nutrient, Max, "calories", 70).with_value(2000),
                Rule::new(Preference, Include, "oats", 60),
                Rule::new(Preference, Exclude, "liver", 50),
                Rule::new(Cuisine, Prefer, "thai", 40),
            ]
        );
    }

    #[test]
    fn rule_json_shape() {
        let rule: Rule = serde_json::from_value(serde_json::json!({
            "type": "meal_type",
            "operation": "include",
            "target": "breakfast",
            "priority": 100
        }))
        .unwrap();
        assert_eq!(rule.kind, RuleType::MealType);
        assert_eq!(rule.value, None);

        let out = serde_json::to_value(
            Rule::new(RuleType::Nutrient, RuleOperation::Min, "protein", 10).with_value(5),
        )
        .unwrap();
        assert_eq!(out["type"], "nutrient");
        assert_eq!(out["operation"], "min");
        assert_eq!(out["value"], 5);
    }

    #[test]
    fn unrecognized_type_and_operation_still_parse() {
        let rule: Rule = serde_json::from_value(serde_json::json!({
            "type": "texture",
            "operation": "blend",
            "target": "crunchy"
        }))
        .unwrap();
        assert_eq!(rule.kind, RuleType::Unknown);
        assert_eq!(rule.operation, RuleOperation::Unknown);
        assert_eq!(rule.priority, 0);
    }
}
