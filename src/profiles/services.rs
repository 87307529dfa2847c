use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::profiles::{dto::ProfileInput, repo, repo_types::Profile};

/// Fails with `Forbidden` when the profile belongs to someone else.
pub fn ensure_owner(profile: &Profile, user_id: Uuid) -> Result<(), AppError> {
    if profile.user_id != user_id {
        warn!(profile_id = %profile.id, %user_id, "profile ownership mismatch");
        return Err(AppError::Forbidden("unauthorized access to profile".into()));
    }
    Ok(())
}

pub async fn get_owned(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<Profile, AppError> {
    let profile = repo::get_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile not found".into()))?;
    ensure_owner(&profile, user_id)?;
    Ok(profile)
}

pub async fn create(db: &PgPool, user_id: Uuid, input: ProfileInput) -> Result<Profile, AppError> {
    let input = input.normalized()?;
    let profile = repo::create(db, user_id, &input).await?;
    info!(profile_id = %profile.id, %user_id, is_default = profile.is_default, "profile created");
    Ok(profile)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    input: ProfileInput,
) -> Result<Profile, AppError> {
    let input = input.normalized()?;
    get_owned(db, id, user_id).await?;
    let profile = repo::update(db, id, user_id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound("profile not found".into()))?;
    info!(profile_id = %id, %user_id, "profile updated");
    Ok(profile)
}

pub async fn set_default(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    get_owned(db, id, user_id).await?;
    if !repo::set_default(db, id, user_id).await? {
        return Err(AppError::NotFound("profile not found".into()));
    }
    info!(profile_id = %id, %user_id, "default profile changed");
    Ok(())
}

pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
    get_owned(db, id, user_id).await?;
    if !repo::delete(db, id, user_id).await? {
        return Err(AppError::NotFound("profile not found".into()));
    }
    info!(profile_id = %id, %user_id, "profile deleted");
    Ok(())
}
