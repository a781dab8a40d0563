pub mod admin;
pub mod characters;
pub mod gallery;
pub mod session;
pub mod tags;
