use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::User;

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, created_at, last_login";

pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(db)
        .await
        .context("find user by email")
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find user by id")
}

/// `None` when the email is already taken.
pub async fn create(
    db: &PgPool,
    email: &str,
    password_hash: &str,
    first_name: &str,
    last_name: &str,
) -> anyhow::Result<Option<User>> {
    let sql = format!(
        "INSERT INTO users (email, password_hash, first_name, last_name) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (email) DO NOTHING \
         RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(db)
        .await
        .context("insert user")
}

pub async fn touch_last_login(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("UPDATE users SET last_login = now() WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("update last_login")?;
    Ok(())
}

/// `None` fields keep their stored value.
pub async fn update_names(
    db: &PgPool,
    id: Uuid,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> anyhow::Result<Option<User>> {
    let sql = format!(
        "UPDATE users \
            SET first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name) \
          WHERE id = $1 \
         RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(db)
        .await
        .context("update user names")
}

pub async fn update_password(db: &PgPool, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
    sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(db)
        .await
        .context("update password")?;
    Ok(())
}

/// Records a refresh token id as used. `false` when it was already revoked.
pub async fn revoke_token(
    db: &PgPool,
    jti: Uuid,
    user_id: Uuid,
    expires_at: OffsetDateTime,
) -> anyhow::Result<bool> {
    let res = sqlx::query(
        "INSERT INTO revoked_tokens (jti, user_id, expires_at) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (jti) DO NOTHING",
    )
    .bind(jti)
    .bind(user_id)
    .bind(expires_at)
    .execute(db)
    .await
    .context("revoke refresh token")?;
    Ok(res.rows_affected() == 1)
}

/// Drops revocation records for tokens that have expired anyway.
pub async fn purge_expired_revocations(db: &PgPool) -> anyhow::Result<u64> {
    let res = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < now()")
        .execute(db)
        .await
        .context("purge expired revocations")?;
    Ok(res.rows_affected())
}
