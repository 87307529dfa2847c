use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::profiles::{repo, repo_types::Profile};

/// Read access to nutrition profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Profile>>;
    async fn get_default_by_user_id(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>>;
}

#[derive(Clone)]
pub struct PgProfileStore {
    db: PgPool,
}

impl PgProfileStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Profile>> {
        repo::get_by_id(&self.db, id).await
    }

    async fn get_default_by_user_id(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        repo::get_default_by_user_id(&self.db, user_id).await
    }
}
