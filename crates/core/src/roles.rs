//! Well-known role name constants and the anonymous placeholder identity.
//!
//! Role names must match the `role` claim issued by the identity provider.

use crate::types::EntityId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_AUTHENTICATED: &str = "authenticated";

/// Owner recorded on submissions made without a session.
///
/// Seeded into the `users` table by the initial migration.
pub const ANONYMOUS_USER_ID: EntityId = uuid::Uuid::nil();
