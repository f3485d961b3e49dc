//! Projection of a completed list into its progress/chapter mismatches.
//!
//! [`project`] is pure: it performs no I/O, holds no state, and returns the
//! same view for the same input. Surfaces call it on every render rather than
//! caching its output.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::CatalogEntry;

/// One render-ready mismatch row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchRow {
    /// Display title (preferred, then alternate, then empty).
    pub title: String,
    /// `"{progress}/{chapters}"` with `?` for an unknown total.
    pub progress_label: String,
    /// Cover image URL.
    pub cover_image_url: String,
    /// Series page URL.
    pub link_url: String,
}

/// Summary counts plus the sorted mismatch rows.
///
/// ## Invariants
/// - `mismatch_count <= total_count`
/// - `rows.len() == mismatch_count`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MismatchView {
    /// Number of entries in the completed list.
    pub total_count: usize,
    /// Number of entries whose progress differs from their chapter total.
    pub mismatch_count: usize,
    /// Mismatched entries ordered by display title.
    pub rows: Vec<MismatchRow>,
}

/// Filter `entries` to mismatches and order them by display title.
///
/// Rows are sorted with [`compare_titles`]; the sort is stable, so entries
/// with equal titles keep their fetch order.
///
/// # Examples
/// ```
/// use anicomplete::domain::{CatalogEntry, ProgressValue, project};
///
/// let entry = |progress: i64, chapters: Option<i64>, title: &str| CatalogEntry {
///     progress: ProgressValue::Number(progress),
///     chapters: chapters.map(ProgressValue::Number),
///     title_preferred: title.to_owned(),
///     title_alternate: String::new(),
///     cover_image_url: String::new(),
///     link_url: String::new(),
///     status: None,
/// };
///
/// let view = project(&[entry(5, Some(5), "Done"), entry(3, Some(10), "Behind")]);
/// assert_eq!(view.total_count, 2);
/// assert_eq!(view.mismatch_count, 1);
/// assert_eq!(view.rows[0].progress_label, "3/10");
/// ```
pub fn project(entries: &[CatalogEntry]) -> MismatchView {
    let mut mismatches = entries
        .iter()
        .filter(|entry| entry.is_mismatch())
        .collect::<Vec<_>>();
    mismatches.sort_by(|left, right| compare_titles(left.display_title(), right.display_title()));

    let rows = mismatches
        .into_iter()
        .map(|entry| MismatchRow {
            title: entry.display_title().to_owned(),
            progress_label: entry.progress_label(),
            cover_image_url: entry.cover_image_url.clone(),
            link_url: entry.link_url.clone(),
        })
        .collect::<Vec<_>>();

    MismatchView {
        total_count: entries.len(),
        mismatch_count: rows.len(),
        rows,
    }
}

/// Locale-aware title ordering.
///
/// Titles are compared in decomposed form (NFD) at three strengths:
///
/// 1. base letters only, case-folded, with punctuation and spaces ahead of
///    digits and digits ahead of letters (`Ōoku` files under `O`);
/// 2. accents, where an unaccented letter sorts first (`Shojo < Shōjo`);
/// 3. case, lowercase first.
///
/// Remaining ties fall back to code-point order so distinct titles never
/// compare equal.
pub fn compare_titles(left: &str, right: &str) -> Ordering {
    base_letters(left)
        .map(primary_weight)
        .cmp(base_letters(right).map(primary_weight))
        .then_with(|| accent_keys(left).cmp(&accent_keys(right)))
        .then_with(|| {
            base_letters(left)
                .map(case_weight)
                .cmp(base_letters(right).map(case_weight))
        })
        .then_with(|| left.cmp(right))
}

fn base_letters(title: &str) -> impl Iterator<Item = char> + '_ {
    title.nfd().filter(|c| !is_combining_mark(*c))
}

/// One entry per base letter: the combining marks that follow it.
fn accent_keys(title: &str) -> Vec<Vec<char>> {
    let mut keys: Vec<Vec<char>> = Vec::new();
    for c in title.nfd() {
        if !is_combining_mark(c) {
            keys.push(Vec::new());
        } else if let Some(marks) = keys.last_mut() {
            marks.push(c);
        }
    }
    keys
}

fn primary_weight(c: char) -> (u8, char) {
    let class = if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    };
    (class, c.to_lowercase().next().unwrap_or(c))
}

fn case_weight(c: char) -> u8 {
    u8::from(c.is_uppercase())
}
