//! Applies a rule set to a single food.
//!
//! Rules are walked in descending priority. The first rule that decides
//! (reject, or accept via a matching `include`) ends evaluation; a food that
//! no rule decides on is accepted.

use crate::foods::Food;
use crate::recommendations::rules::{Rule, RuleOperation, RuleType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Accept,
    Reject,
    Continue,
}

/// Stable sort by descending priority; ties keep insertion order.
pub fn sort_by_priority(rules: &mut [Rule]) {
    rules.sort_by(|a, b| b.priority.cmp(&a.priority));
}

/// Evaluate `food` against `rules` in any order; sorts a copy first.
pub fn accepts(food: &Food, rules: &[Rule]) -> bool {
    let mut ordered = rules.to_vec();
    sort_by_priority(&mut ordered);
    accepts_ordered(food, &ordered)
}

/// Evaluate against rules already sorted with [`sort_by_priority`].
pub fn accepts_ordered(food: &Food, rules: &[Rule]) -> bool {
    for rule in rules {
        match verdict(food, rule) {
            Verdict::Accept => return true,
            Verdict::Reject => return false,
            Verdict::Continue => {}
        }
    }
    true
}

fn verdict(food: &Food, rule: &Rule) -> Verdict {
    match rule.operation {
        RuleOperation::Exclude if matches_exclusion(food, rule) => Verdict::Reject,
        RuleOperation::Include if matches_inclusion(food, rule) => Verdict::Accept,
        RuleOperation::Max if !within_max(food, rule) => Verdict::Reject,
        RuleOperation::Min if !within_min(food, rule) => Verdict::Reject,
        // prefer only affects ranking; unknown operations never decide
        _ => Verdict::Continue,
    }
}

fn matches_exclusion(food: &Food, rule: &Rule) -> bool {
    let target = rule.target.as_str();
    if target.is_empty() {
        return false;
    }
    match rule.kind {
        RuleType::Allergen | RuleType::Dietary => mentions(food, target),
        RuleType::Preference => mentions(food, target) || contains_ignore_case(&food.name, target),
        _ => false,
    }
}

fn matches_inclusion(food: &Food, rule: &Rule) -> bool {
    let target = rule.target.as_str();
    match rule.kind {
        RuleType::Preference if !target.is_empty() => {
            any_eq_ignore_case(&food.labels, target)
                || any_eq_ignore_case(&food.alternate_names, target)
                || contains_ignore_case(&food.name, target)
        }
        _ => false,
    }
}

fn within_max(food: &Food, rule: &Rule) -> bool {
    match bounds(food, rule) {
        Some((value, limit)) => value <= limit,
        None => true,
    }
}

fn within_min(food: &Food, rule: &Rule) -> bool {
    match bounds(food, rule) {
        Some((value, limit)) => value >= limit,
        None => true,
    }
}

/// `(food value, rule threshold)` when both are usable; `None` makes the
/// rule non-binding.
fn bounds(food: &Food, rule: &Rule) -> Option<(f64, f64)> {
    if rule.kind != RuleType::Nutrient {
        return None;
    }
    let limit = rule.value.as_ref()?.as_f64()?;
    let value = nutrient_value(food, &rule.target)?;
    Some((value, limit))
}

/// Numeric nutrient value, coercing numeric strings.
pub fn nutrient_value(food: &Food, nutrient: &str) -> Option<f64> {
    match food.nutrition_100g.get(nutrient)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Exact label / alternate-name membership, or ingredient text mention.
fn mentions(food: &Food, target: &str) -> bool {
    food.labels.iter().any(|l| l == target)
        || food.alternate_names.iter().any(|n| n == target)
        || food
            .ingredients
            .as_deref()
            .is_some_and(|i| contains_ignore_case(i, target))
}

fn any_eq_ignore_case(items: &[String], target: &str) -> bool {
    let target = target.to_lowercase();
    items.iter().any(|s| s.to_lowercase() == target)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
