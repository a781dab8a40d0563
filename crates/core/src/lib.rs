//! Domain logic for the moderated character gallery.
//!
//! Submissions enter as `pending`, administrators approve or reject them,
//! and approved characters appear in the public gallery split by whether
//! they carry music. Persistence, file storage, identity and audio are
//! reached through ports so the same logic runs against PostgreSQL or the
//! in-memory store.

pub mod character;
pub mod demo_data;
pub mod engagement;
pub mod error;
pub mod gallery;
pub mod media;
pub mod memory_store;
pub mod moderation;
pub mod playback;
pub mod ports;
pub mod roles;
pub mod session;
pub mod status;
pub mod storage;
pub mod submission;
pub mod tag;
pub mod types;
