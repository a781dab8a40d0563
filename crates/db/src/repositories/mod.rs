//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument and return raw rows.

pub mod asset_repo;
pub mod character_repo;
pub mod engagement_repo;
pub mod music_repo;
pub mod tag_repo;
pub mod user_repo;

pub use asset_repo::AssetRepo;
pub use character_repo::CharacterRepo;
pub use engagement_repo::EngagementRepo;
pub use music_repo::MusicRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
