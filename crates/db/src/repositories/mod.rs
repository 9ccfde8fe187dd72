//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Plain
//! reads and writes accept `&PgPool`; methods that take part in a caller's
//! transaction accept `&mut PgConnection` instead (pass `&mut *tx`). Safe
//! deletes open their own transaction.

pub mod category_repo;
pub mod course_repo;
pub mod enrollment_repo;
pub mod lesson_repo;
pub mod progress_repo;
pub mod review_repo;
pub mod search_repo;
pub mod section_repo;
pub mod user_repo;
pub mod watchlist_repo;

pub use category_repo::CategoryRepo;
pub use course_repo::CourseRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use lesson_repo::LessonRepo;
pub use progress_repo::ProgressRepo;
pub use review_repo::ReviewRepo;
pub use search_repo::SearchRepo;
pub use section_repo::SectionRepo;
pub use user_repo::{InstructorRepo, UserRepo};
pub use watchlist_repo::WatchlistRepo;
