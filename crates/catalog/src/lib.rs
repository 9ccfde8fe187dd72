//! Course-catalog services.
//!
//! Each service is a zero-sized struct whose async methods take the pool,
//! the acting user where the operation is guarded, and typed inputs from
//! `academy_db::models`. Domain rules come from `academy_core`; persistence
//! from `academy_db` repositories.

pub mod categories;
pub mod config;
pub mod content;
pub mod courses;
pub mod enrollment;
pub mod error;
pub mod reviews;
pub mod search;
pub mod watchlist;

pub use categories::CategoryService;
pub use content::ContentService;
pub use courses::CourseService;
pub use enrollment::EnrollmentService;
pub use error::{CatalogError, CatalogResult};
pub use reviews::ReviewService;
pub use search::SearchService;
pub use watchlist::WatchlistService;
