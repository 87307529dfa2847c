use async_trait::async_trait;
use sqlx::PgPool;

use crate::foods::{repo, repo_types::Food};

/// Read-only paginated access to the food catalog.
#[async_trait]
pub trait FoodCatalog: Send + Sync {
    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Food>>;
    async fn list_by_type(&self, food_type: &str, limit: i64, offset: i64) -> anyhow::Result<Vec<Food>>;
    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Food>>;
}

#[derive(Clone)]
pub struct PgFoodCatalog {
    db: PgPool,
}

impl PgFoodCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodCatalog for PgFoodCatalog {
    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Food>> {
        repo::list(&self.db, limit, offset).await
    }

    async fn list_by_type(&self, food_type: &str, limit: i64, offset: i64) -> anyhow::Result<Vec<Food>> {
        repo::list_by_type(&self.db, food_type, limit, offset).await
    }

    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Food>> {
        repo::get_by_id(&self.db, id).await
    }
}
