//! Domain rules for the course catalog.
//!
//! Pure functions and types only: no database or I/O. The `academy-db`
//! repositories load rows and the `academy-catalog` services apply these
//! rules to them.

pub mod category;
pub mod content;
pub mod course;
pub mod error;
pub mod integrity;
pub mod pagination;
pub mod progress;
pub mod roles;
pub mod search;
pub mod types;
