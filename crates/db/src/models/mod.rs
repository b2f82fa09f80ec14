//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) where patches exist

pub mod article;
pub mod category;
pub mod comment;
pub mod favorite;
pub mod media;
pub mod refresh_token;
pub mod user;
