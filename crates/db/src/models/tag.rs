//! Tag row models.

use gallery_core::tag::Tag;
use gallery_core::types::EntityId;
use sqlx::FromRow;

/// A row from the `tags` table. `type` is selected as `tag_type`.
#[derive(Debug, Clone, FromRow)]
pub struct TagRow {
    pub id: EntityId,
    pub name: String,
    pub color: Option<String>,
    pub tag_type: String,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            color: row.color,
            tag_type: row.tag_type,
        }
    }
}

/// A tag joined through `character_tags`, keyed by the character it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct CharacterTagRow {
    pub character_id: EntityId,
    #[sqlx(flatten)]
    pub tag: TagRow,
}
