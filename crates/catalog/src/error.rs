use academy_core::error::CoreError;
use academy_core::types::DbId;

/// Error type for catalog service operations.
///
/// Wraps [`CoreError`] for domain errors and [`sqlx::Error`] for storage
/// failures. Constraint violations that encode domain rules are classified
/// into [`CoreError`] variants on conversion.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A domain-level error from `academy_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error that does not map onto a domain rule.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

/// Convenience type alias for service return values.
pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    /// Stable error code for callers at the boundary.
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::Core(core) => match core {
                CoreError::Validation { .. } => "VALIDATION_ERROR",
                CoreError::ReferentialIntegrity(_) => "REFERENTIAL_INTEGRITY",
                CoreError::NotFound { .. } => "NOT_FOUND",
                CoreError::Forbidden(_) => "FORBIDDEN",
                CoreError::Conflict(_) => "CONFLICT",
                CoreError::Internal(_) => "INTERNAL_ERROR",
            },
            CatalogError::Database(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert the error of a write that references `entity` `id`.
    ///
    /// A foreign-key violation (`23503`) means the referenced row was deleted
    /// after it was looked up, so it reads as `NotFound`. Anything else is
    /// classified as usual.
    pub fn missing_reference(err: sqlx::Error, entity: &'static str, id: DbId) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // PostgreSQL foreign key violation
            if db_err.code().as_deref() == Some("23503") {
                tracing::debug!(
                    constraint = db_err.constraint().unwrap_or("unknown"),
                    entity,
                    id,
                    "Referenced row no longer exists",
                );
                return CatalogError::Core(CoreError::NotFound { entity, id });
            }
        }
        classify_sqlx_error(err)
    }

    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            CatalogError::Core(core) => Some(core),
            CatalogError::Database(_) => None,
        }
    }
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        classify_sqlx_error(err)
    }
}

/// Classify a sqlx error.
///
/// - Unique violations (`23505`) on `uq_*` constraints become `Conflict`.
/// - Check violations (`23514`) on `ck_*` constraints become `Validation`.
/// - Everything else stays `Database` and is logged.
fn classify_sqlx_error(err: sqlx::Error) -> CatalogError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or("unknown");
        match db_err.code().as_deref() {
            // PostgreSQL unique constraint violation
            Some("23505") if constraint.starts_with("uq_") => {
                return CatalogError::Core(CoreError::Conflict(conflict_message(constraint)));
            }
            // PostgreSQL check constraint violation
            Some("23514") if constraint.starts_with("ck_") => {
                return CatalogError::Core(CoreError::validation(
                    check_field(constraint),
                    format!("value violates check constraint: {constraint}"),
                ));
            }
            _ => {}
        }
    }
    tracing::error!(error = %err, "Database error");
    CatalogError::Database(err)
}

fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_categories_slug" => "a category with this slug already exists".to_string(),
        "uq_categories_name_parent" => {
            "a category with this name already exists under the same parent".to_string()
        }
        "uq_sections_course_order" => "order_no is already taken in this course".to_string(),
        "uq_lessons_section_order" => "order_no is already taken in this section".to_string(),
        "uq_reviews_user_course" => "you have already reviewed this course".to_string(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

fn check_field(constraint: &str) -> &'static str {
    match constraint {
        "ck_courses_price_non_negative" => "price",
        "ck_courses_promo_within_price" => "promo_price",
        "ck_sections_order_positive" | "ck_lessons_order_positive" => "order_no",
        "ck_lessons_duration_non_negative" => "duration_sec",
        "ck_reviews_rating_range" => "rating",
        "ck_categories_not_self_parent" => "parent_id",
        "ck_users_role" => "role",
        _ => "record",
    }
}
