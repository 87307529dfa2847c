use serde::Deserialize;

use crate::error::AppError;

/// Body for creating or replacing a profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    pub profile_name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub health_conditions: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub goal_type: Option<String>,
    #[serde(default)]
    pub calorie_target: Option<i32>,
    #[serde(default)]
    pub macronutrient_preference: Option<String>,
    #[serde(default)]
    pub disliked_foods: Vec<String>,
    #[serde(default)]
    pub preferred_foods: Vec<String>,
    #[serde(default)]
    pub cuisine_preferences: Vec<String>,
}

impl ProfileInput {
    /// Trims names and list entries, drops blank and repeated entries.
    pub fn normalized(mut self) -> Result<Self, AppError> {
        self.profile_name = self.profile_name.trim().to_string();
        if self.profile_name.is_empty() {
            return Err(AppError::BadRequest("profile_name is required".into()));
        }
        if matches!(self.calorie_target, Some(t) if t < 0) {
            return Err(AppError::BadRequest("calorie_target must not be negative".into()));
        }
        for list in [
            &mut self.health_conditions,
            &mut self.dietary_restrictions,
            &mut self.allergens,
            &mut self.disliked_foods,
            &mut self.preferred_foods,
            &mut self.cuisine_preferences,
        ] {
            clean_list(list);
        }
        self.goal_type = non_blank(self.goal_type);
        self.macronutrient_preference = non_blank(self.macronutrient_preference);
        Ok(self)
    }
}

fn clean_list(list: &mut Vec<String>) {
    let mut out: Vec<String> = Vec::with_capacity(list.len());
    for item in list.drain(..) {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|s| s == item) {
            out.push(item.to_string());
        }
    }
    *list = out;
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_trims_and_dedupes_preserving_order() {
        let input = ProfileInput {
            profile_name: "  Everyday ".into(),
            allergens: vec![" peanuts".into(), "".into(), "shellfish".into(), "peanuts ".into()],
            goal_type: Some("   ".into()),
            ..Default::default()
        }
        .normalized()
        .unwrap();
        assert_eq!(input.profile_name, "Everyday");
        assert_eq!(input.allergens, vec!["peanuts", "shellfish"]);
        assert_eq!(input.goal_type, None);
    }

    #[test]
    fn normalized_rejects_blank_name_and_negative_calories() {
        let blank = ProfileInput { profile_name: " ".into(), ..Default::default() };
        assert!(matches!(blank.normalized(), Err(AppError::BadRequest(_))));

        let negative = ProfileInput {
            profile_name: "x".into(),
            calorie_target: Some(-1),
            ..Default::default()
        };
        assert!(matches!(negative.normalized(), Err(AppError::BadRequest(_))));
    }
}
