//! Database row structs.
//!
//! Each submodule holds the `FromRow` struct matching a table and its
//! conversion into the core domain type. Enum-like columns are read as text
//! and parsed during conversion.

pub mod asset;
pub mod character;
pub mod engagement;
pub mod music;
pub mod tag;
pub mod user;
