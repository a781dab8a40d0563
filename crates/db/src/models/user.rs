//! User row model. Only the public profile columns are read.

use gallery_core::character::UserSummary;
use gallery_core::types::EntityId;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: EntityId,
    pub name: String,
    pub handle: String,
    pub avatar_url: Option<String>,
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            handle: row.handle,
            avatar_url: row.avatar_url,
        }
    }
}
