// draft.rs - Field rules for a category before it is written.

use std::sync::OnceLock;

use regex::Regex;

use crate::category::{Category, CategoryId};
use crate::error::TaxonomyError;

/// Maximum category name length accepted by the category form.
pub const MAX_NAME_LEN: usize = 100;

const SLUG_PATTERN: &str = r"^[a-z0-9-]+$";

fn slug_regex() -> &'static Regex {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    SLUG.get_or_init(|| Regex::new(SLUG_PATTERN).expect("slug pattern is a valid regex"))
}

pub fn is_valid_slug(slug: &str) -> bool {
    slug_regex().is_match(slug)
}

/// Every field problem with `category`, in form order. Empty means valid.
///
/// Parent links are checked separately by
/// [`crate::tree::check_parent_assignment`] because they need the rest of
/// the snapshot.
pub fn validate_category(category: &Category) -> Vec<String> {
    let mut reasons = Vec::new();

    let name = category.name.trim();
    if name.is_empty() {
        reasons.push("Name is required".to_string());
    } else if name.chars().count() > MAX_NAME_LEN {
        reasons.push("Name is too long".to_string());
    }

    if !is_valid_slug(&category.slug) {
        reasons.push("Slug must be lowercase letters, numbers, and hyphens only".to_string());
    }

    reasons
}

/// Reject `slug` when another category in the snapshot already uses it.
///
/// `id` is the category being written (`None` on create); its own row
/// does not count, so an update may keep its slug.
pub fn check_slug_available(
    categories: &[Category],
    id: Option<CategoryId>,
    slug: &str,
) -> Result<(), TaxonomyError> {
    let taken = categories
        .iter()
        .any(|c| c.slug == slug && Some(c.id) != id);
    if taken {
        return Err(TaxonomyError::DuplicateSlug {
            slug: slug.to_string(),
        });
    }
    Ok(())
}
