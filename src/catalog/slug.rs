//! Slug derivation and allocation
//!
//! A slug is the lowercase ASCII identifier a category is addressed by on the
//! storefront. Derivation never fails; collisions are resolved by appending a
//! numeric suffix.

use crate::db::repository::{CategoryRepository, RepoResult};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fallback base for names that normalize to nothing (all symbols)
const FALLBACK_SLUG: &str = "category";

/// Normalize a display name into a base slug.
///
/// NFD-decomposes so accented letters split into base letter plus combining
/// mark, drops the marks, lowercases, and collapses every run of
/// non-alphanumeric characters into a single hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.nfd().filter(|c| !is_combining_mark(*c)) {
        for lower in ch.to_lowercase() {
            if lower.is_ascii_alphanumeric() {
                slug.push(lower);
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Allocates unique slugs against the current category table
#[derive(Clone)]
pub struct SlugAllocator {
    categories: CategoryRepository,
}

impl SlugAllocator {
    pub fn new(categories: CategoryRepository) -> Self {
        Self { categories }
    }

    /// Derive a slug from a display name and make it unique.
    ///
    /// `exclude_id` skips the category being updated, so keeping the same
    /// name keeps the same slug.
    pub async fn allocate_from_name(
        &self,
        name: &str,
        exclude_id: Option<i64>,
    ) -> RepoResult<String> {
        self.ensure_unique(&slugify(name), exclude_id).await
    }

    /// Make a caller-supplied base slug unique by appending `-1`, `-2`, …
    /// until no other category owns it.
    pub async fn ensure_unique(&self, base: &str, exclude_id: Option<i64>) -> RepoResult<String> {
        let mut candidate = base.to_string();
        let mut counter = 1u32;
        while self.categories.slug_taken(&candidate, exclude_id).await? {
            candidate = format!("{base}-{counter}");
            counter += 1;
        }
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics_and_lowercases() {
        assert_eq!(slugify("São João"), "sao-joao");
        assert_eq!(slugify("Calçados Femininos"), "calcados-femininos");
        assert_eq!(slugify("ROUPAS"), "roupas");
    }

    #[test]
    fn collapses_symbol_runs_into_single_hyphen() {
        assert_eq!(slugify("Camisas & Polos"), "camisas-polos");
        assert_eq!(slugify("a  --  b"), "a-b");
    }

    #[test]
    fn trims_leading_and_trailing_hyphens() {
        assert_eq!(slugify("  Inverno 2024!  "), "inverno-2024");
        assert_eq!(slugify("---x---"), "x");
    }

    #[test]
    fn all_symbol_names_fall_back() {
        assert_eq!(slugify("!!!"), "category");
        assert_eq!(slugify(""), "category");
    }
}
