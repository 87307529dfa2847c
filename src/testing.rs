//! Builders and in-memory stores shared by unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::foods::{Food, FoodCatalog};
use crate::profiles::{Profile, ProfileStore};

pub fn food(id: &str) -> Food {
    Food {
        id: id.to_string(),
        name: id.to_string(),
        alternate_names: Vec::new(),
        description: None,
        food_type: None,
        labels: Vec::new(),
        ingredients: None,
        nutrition_100g: BTreeMap::new(),
        ean_13: None,
        created_at: OffsetDateTime::UNIX_EPOCH,
        updated_at: OffsetDateTime::UNIX_EPOCH,
    }
}

pub fn profile(user_id: Uuid) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        user_id,
        profile_name: "Default".into(),
        is_default: true,
        health_conditions: Vec::new(),
        dietary_restrictions: Vec::new(),
        allergens: Vec::new(),
        goal_type: None,
        calorie_target: None,
        macronutrient_preference: None,
        disliked_foods: Vec::new(),
        preferred_foods: Vec::new(),
        cuisine_preferences: Vec::new(),
        created_at: OffsetDateTime::UNIX_EPOCH,
        updated_at: OffsetDateTime::UNIX_EPOCH,
    }
}

fn page<'a>(foods: impl Iterator<Item = &'a Food>, limit: i64, offset: i64) -> Vec<Food> {
    foods
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

/// Catalog over a fixed list, in insertion order.
pub struct MemoryCatalog {
    foods: Vec<Food>,
    fail: bool,
    last_list: Mutex<Option<(i64, i64)>>,
}

impl MemoryCatalog {
    pub fn new(foods: Vec<Food>) -> Self {
        Self {
            foods,
            fail: false,
            last_list: Mutex::new(None),
        }
    }

    /// Every call returns an error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    /// `(limit, offset)` of the most recent `list` call.
    pub fn last_list_call(&self) -> Option<(i64, i64)> {
        *self.last_list.lock().unwrap()
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("catalog unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl FoodCatalog for MemoryCatalog {
    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Food>> {
        self.check()?;
        *self.last_list.lock().unwrap() = Some((limit, offset));
        Ok(page(self.foods.iter(), limit, offset))
    }

    async fn list_by_type(&self, food_type: &str, limit: i64, offset: i64) -> anyhow::Result<Vec<Food>> {
        self.check()?;
        let matching = self
            .foods
            .iter()
            .filter(|f| f.food_type.as_deref() == Some(food_type));
        Ok(page(matching, limit, offset))
    }

    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Food>> {
        self.check()?;
        Ok(self.foods.iter().find(|f| f.id == id).cloned())
    }
}

pub struct MemoryProfiles {
    profiles: Vec<Profile>,
}

impl MemoryProfiles {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Profile>> {
        Ok(self.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn get_default_by_user_id(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        Ok(self
            .profiles
            .iter()
            .find(|p| p.user_id == user_id && p.is_default)
            .cloned())
    }
}
