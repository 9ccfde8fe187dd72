//! Category hierarchy rules.
//!
//! Categories form a tree at most two levels deep: a root may have children,
//! a child may never itself become a parent. Courses attach only to leaves.
//! Everything here is pure; the repository layer supplies the rows.

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum hierarchy depth (root = 1, child = 2).
pub const MAX_CATEGORY_DEPTH: u8 = 2;

/// Maximum length of a category name, in characters.
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Maximum length of a slug, in bytes (slugs are ASCII).
pub const MAX_SLUG_LEN: usize = 120;

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// Normalize arbitrary text into a lowercase-hyphenated ASCII slug.
///
/// Whitespace, `-` and `_` become single hyphens, common Latin diacritics
/// are folded to their base letter, and every other character is dropped.
///
/// # Examples
///
/// ```
/// use academy_core::category::slugify;
///
/// assert_eq!(slugify("Web Development"), "web-development");
/// assert_eq!(slugify("  C++ / Rust  "), "c-rust");
/// assert_eq!(slugify("Lập trình"), "lap-trinh");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        let mapped = if c.is_ascii_alphanumeric() {
            Some(c)
        } else {
            fold_diacritic(c)
        };

        match mapped {
            Some(ch) => {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(ch);
            }
            None if c.is_whitespace() || c == '-' || c == '_' => pending_hyphen = true,
            None => {}
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    slug.trim_end_matches('-').to_string()
}

/// Map an accented lowercase Latin letter to its ASCII base letter.
fn fold_diacritic(c: char) -> Option<char> {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' | 'ạ' | 'ả' | 'ấ' | 'ầ' | 'ẩ' | 'ẫ'
        | 'ậ' | 'ắ' | 'ằ' | 'ẳ' | 'ẵ' | 'ặ' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'đ' | 'ď' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' | 'ẹ' | 'ẻ' | 'ẽ' | 'ế' | 'ề' | 'ể' | 'ễ' | 'ệ' => {
            'e'
        }
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ỉ' | 'ị' | 'ĩ' => 'i',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ơ' | 'ọ' | 'ỏ' | 'ố' | 'ồ' | 'ổ' | 'ỗ' | 'ộ'
        | 'ớ' | 'ờ' | 'ở' | 'ỡ' | 'ợ' => 'o',
        'ř' => 'r',
        'ś' | 'š' | 'ß' => 's',
        'ť' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ư' | 'ụ' | 'ủ' | 'ũ' | 'ứ' | 'ừ' | 'ử' | 'ữ' | 'ự' => {
            'u'
        }
        'ý' | 'ÿ' | 'ỳ' | 'ỷ' | 'ỹ' | 'ỵ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => return None,
    };
    Some(base)
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Validate and trim a category name.
pub fn validate_category_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("name", "category name must not be empty"));
    }
    if trimmed.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(CoreError::validation(
            "name",
            format!("category name must be at most {MAX_CATEGORY_NAME_LEN} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Resolve the slug to store: the explicit slug when given, else the name.
///
/// Both are normalized with [`slugify`]; an empty result is rejected.
pub fn resolve_slug(explicit: Option<&str>, name: &str) -> Result<String, CoreError> {
    let source = match explicit {
        Some(s) if !s.trim().is_empty() => s,
        _ => name,
    };
    let slug = slugify(source);
    if slug.is_empty() {
        return Err(CoreError::validation(
            "slug",
            "slug must contain at least one ASCII letter or digit",
        ));
    }
    Ok(slug)
}

// ---------------------------------------------------------------------------
// Hierarchy rules
// ---------------------------------------------------------------------------

/// The facts about a prospective parent needed to validate a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentFacts {
    pub id: DbId,
    /// The prospective parent's own parent.
    pub parent_id: Option<DbId>,
    /// Whether any course is attached to the prospective parent.
    pub has_courses: bool,
}

/// Validate placing a category under `parent`.
///
/// - `category_id` is `None` on create, `Some(id)` on update.
/// - `category_has_children` is whether the category being placed already
///   has children (always `false` on create).
/// - `parent` is `None` when `parent_id` did not resolve.
pub fn validate_placement(
    category_id: Option<DbId>,
    category_has_children: bool,
    requested_parent_id: DbId,
    parent: Option<&ParentFacts>,
) -> Result<(), CoreError> {
    if category_id == Some(requested_parent_id) {
        return Err(CoreError::validation(
            "parent_id",
            "a category cannot be its own parent",
        ));
    }

    let parent = parent.ok_or_else(|| {
        CoreError::validation(
            "parent_id",
            format!("parent category {requested_parent_id} does not exist"),
        )
    })?;

    if parent.parent_id.is_some() {
        return Err(CoreError::validation(
            "parent_id",
            format!("category hierarchy is limited to {MAX_CATEGORY_DEPTH} levels"),
        ));
    }
    if category_has_children {
        return Err(CoreError::validation(
            "parent_id",
            "a category with children cannot be moved under another category",
        ));
    }
    if parent.has_courses {
        return Err(CoreError::validation(
            "parent_id",
            "the parent category already has courses attached",
        ));
    }
    Ok(())
}

/// Validate that a course may be attached to a category.
///
/// `child_count` is `None` when the category does not exist.
pub fn validate_course_category(cat_id: DbId, child_count: Option<i64>) -> Result<(), CoreError> {
    match child_count {
        None => Err(CoreError::validation(
            "cat_id",
            format!("category {cat_id} does not exist"),
        )),
        Some(0) => Ok(()),
        Some(_) => Err(CoreError::validation(
            "cat_id",
            "courses can only be attached to a leaf category",
        )),
    }
}

// ---------------------------------------------------------------------------
// Tree projection
// ---------------------------------------------------------------------------

/// Group flat category rows into roots with their children.
///
/// Roots are ordered by id ascending, children within a root likewise.
/// Rows whose parent is not a root in `rows` are dropped.
pub fn group_two_level<T>(
    rows: Vec<T>,
    id_of: impl Fn(&T) -> DbId,
    parent_of: impl Fn(&T) -> Option<DbId>,
) -> Vec<(T, Vec<T>)> {
    let (mut roots, mut children): (Vec<T>, Vec<T>) =
        rows.into_iter().partition(|row| parent_of(row).is_none());
    roots.sort_by_key(|row| id_of(row));
    children.sort_by_key(|row| id_of(row));

    let mut tree: Vec<(T, Vec<T>)> = roots.into_iter().map(|root| (root, Vec::new())).collect();
    for child in children {
        let Some(parent_id) = parent_of(&child) else {
            continue;
        };
        if let Ok(pos) = tree.binary_search_by_key(&parent_id, |(root, _)| id_of(root)) {
            tree[pos].1.push(child);
        }
    }
    tree
}
