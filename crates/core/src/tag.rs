//! Tags joined to characters through a many-to-many association.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// A descriptive label shown on gallery cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: EntityId,
    pub name: String,
    /// Hex color code (e.g. `"#F59E0B"`).
    pub color: Option<String>,
    /// Category label such as `feature`, `world` or `emotion`.
    #[serde(rename = "type")]
    pub tag_type: String,
}
