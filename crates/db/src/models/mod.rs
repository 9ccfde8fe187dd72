//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Joined read models (cards, outlines, admin rows) live next to the entity
//! they are centred on.

pub mod category;
pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod review;
pub mod search;
pub mod section;
pub mod user;
