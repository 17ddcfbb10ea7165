use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Admin;

pub async fn create_admin(
    pool: &PgPool,
    full_name: &str,
    email: &str,
    mobile_number: &str,
    password_hash: &str,
) -> anyhow::Result<Admin> {
    let admin = sqlx::query_as::<_, Admin>(
        r#"
        INSERT INTO admins (full_name, email, mobile_number, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(full_name)
    .bind(email)
    .bind(mobile_number)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(admin)
}

pub async fn get_admin(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(admin)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> anyhow::Result<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(admin)
}

pub async fn find_by_mobile(pool: &PgPool, mobile_number: &str) -> anyhow::Result<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE mobile_number = $1")
        .bind(mobile_number)
        .fetch_optional(pool)
        .await?;

    Ok(admin)
}
