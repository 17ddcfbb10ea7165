use sqlx::PgPool;
use uuid::Uuid;

use crate::models::User;

/// Insert a new user. `password_hash` must already be hashed.
pub async fn create_user(
    pool: &PgPool,
    full_name: &str,
    email: &str,
    mobile_number: &str,
    aadhar: &str,
    password_hash: &str,
) -> anyhow::Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (full_name, email, mobile_number, aadhar, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(full_name)
    .bind(email)
    .bind(mobile_number)
    .bind(aadhar)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_mobile(pool: &PgPool, mobile_number: &str) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE mobile_number = $1")
        .bind(mobile_number)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_aadhar(pool: &PgPool, aadhar: &str) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE aadhar = $1")
        .bind(aadhar)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// Resolve a login identifier: email first, then mobile number, then Aadhaar.
pub async fn find_by_identifier(pool: &PgPool, identifier: &str) -> anyhow::Result<Option<User>> {
    if let Some(user) = find_by_email(pool, identifier).await? {
        return Ok(Some(user));
    }
    if let Some(user) = find_by_mobile(pool, identifier).await? {
        return Ok(Some(user));
    }
    find_by_aadhar(pool, identifier).await
}

pub async fn list_users(pool: &PgPool) -> anyhow::Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;

    Ok(users)
}

pub async fn count_users(pool: &PgPool) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Update profile fields. `password_hash` is left untouched when `None`.
pub async fn update_user(
    pool: &PgPool,
    id: Uuid,
    full_name: &str,
    email: &str,
    mobile_number: &str,
    aadhar: &str,
    password_hash: Option<&str>,
) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET full_name = $2,
            email = $3,
            mobile_number = $4,
            aadhar = $5,
            password_hash = COALESCE($6, password_hash)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(full_name)
    .bind(email)
    .bind(mobile_number)
    .bind(aadhar)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Delete a user. Their loan applications go with them (ON DELETE CASCADE).
pub async fn delete_user(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
