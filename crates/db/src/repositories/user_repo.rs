//! Repository for the `users` table.

use gallery_core::character::NewUser;
use gallery_core::types::EntityId;
use sqlx::PgPool;

use crate::models::user::UserRow;

pub struct UserRepo;

impl UserRepo {
    /// Insert `user` if no row with its id exists yet.
    pub async fn ensure(pool: &PgPool, user: &NewUser) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO users (id, name, handle, role)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.handle)
        .bind(&user.role)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Public profiles of every user in `ids`. Unknown ids are skipped.
    pub async fn list_by_ids(pool: &PgPool, ids: &[EntityId]) -> Result<Vec<UserRow>, sqlx::Error> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, name, handle, avatar_url FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
