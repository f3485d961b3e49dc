//! Completed-list entries as returned by the catalog service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A progress or chapter value exactly as the service reported it.
///
/// The service normally answers with integers, but older list exports carry
/// strings. Values are compared literally: `Number(5)` and `Text("5")` are
/// different values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgressValue {
    /// Integer count.
    Number(i64),
    /// Free-form textual count.
    Text(String),
}

impl ProgressValue {
    /// Whether the value renders as "unknown" (`0` or an empty string).
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Number(value) => *value == 0,
            Self::Text(value) => value.is_empty(),
        }
    }
}

impl fmt::Display for ProgressValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for ProgressValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ProgressValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// One item from the user's "Completed" list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Chapters the user has recorded as read.
    pub progress: ProgressValue,
    /// Total chapters in the series; absent while a series is unfinished.
    pub chapters: Option<ProgressValue>,
    /// English title, empty when the service has none.
    pub title_preferred: String,
    /// Romanised title, empty when the service has none.
    pub title_alternate: String,
    /// Large cover image URL.
    pub cover_image_url: String,
    /// Series page on the catalog site.
    pub link_url: String,
    /// List-entry status string (for example `COMPLETED`), when reported.
    pub status: Option<String>,
}

impl CatalogEntry {
    /// Whether recorded progress differs from the chapter total.
    ///
    /// An absent chapter total never equals progress.
    ///
    /// # Examples
    /// ```
    /// use anicomplete::domain::{CatalogEntry, ProgressValue};
    ///
    /// let entry = CatalogEntry {
    ///     progress: ProgressValue::Number(3),
    ///     chapters: None,
    ///     title_preferred: String::new(),
    ///     title_alternate: "Berserk".to_owned(),
    ///     cover_image_url: String::new(),
    ///     link_url: String::new(),
    ///     status: None,
    /// };
    /// assert!(entry.is_mismatch());
    /// ```
    pub fn is_mismatch(&self) -> bool {
        self.chapters.as_ref() != Some(&self.progress)
    }

    /// Title shown to the user: preferred, then alternate, then empty.
    pub fn display_title(&self) -> &str {
        if self.title_preferred.is_empty() {
            self.title_alternate.as_str()
        } else {
            self.title_preferred.as_str()
        }
    }

    /// Render progress as `"{progress}/{chapters}"`, using `?` for an
    /// unknown total.
    pub fn progress_label(&self) -> String {
        match self.chapters.as_ref().filter(|chapters| !chapters.is_blank()) {
            Some(chapters) => format!("{}/{chapters}", self.progress),
            None => format!("{}/?", self.progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(progress: ProgressValue, chapters: Option<ProgressValue>) -> CatalogEntry {
        CatalogEntry {
            progress,
            chapters,
            title_preferred: String::new(),
            title_alternate: String::new(),
            cover_image_url: String::new(),
            link_url: String::new(),
            status: None,
        }
    }

    #[rstest]
    #[case(ProgressValue::from(5), Some(ProgressValue::from(5)), false)]
    #[case(ProgressValue::from(3), Some(ProgressValue::from(10)), true)]
    #[case(ProgressValue::from(2), None, true)]
    #[case(ProgressValue::from(5), Some(ProgressValue::from("5")), true)]
    #[case(ProgressValue::from("12"), Some(ProgressValue::from("12")), false)]
    fn mismatch_uses_literal_comparison(
        #[case] progress: ProgressValue,
        #[case] chapters: Option<ProgressValue>,
        #[case] expected: bool,
    ) {
        assert_eq!(entry(progress, chapters).is_mismatch(), expected);
    }

    #[rstest]
    #[case(ProgressValue::from(3), Some(ProgressValue::from(10)), "3/10")]
    #[case(ProgressValue::from(2), None, "2/?")]
    #[case(ProgressValue::from(4), Some(ProgressValue::from(0)), "4/?")]
    #[case(ProgressValue::from(4), Some(ProgressValue::from("")), "4/?")]
    #[case(ProgressValue::from("7"), Some(ProgressValue::from("9")), "7/9")]
    fn progress_label_marks_unknown_totals(
        #[case] progress: ProgressValue,
        #[case] chapters: Option<ProgressValue>,
        #[case] expected: &str,
    ) {
        assert_eq!(entry(progress, chapters).progress_label(), expected);
    }

    #[test]
    fn display_title_falls_back_to_alternate() {
        let mut item = entry(ProgressValue::from(1), None);
        assert_eq!(item.display_title(), "");
        item.title_alternate = "Shingeki no Kyojin".to_owned();
        assert_eq!(item.display_title(), "Shingeki no Kyojin");
        item.title_preferred = "Attack on Titan".to_owned();
        assert_eq!(item.display_title(), "Attack on Titan");
    }

    #[test]
    fn untagged_values_decode_from_numbers_and_strings() {
        let values: Vec<ProgressValue> =
            serde_json::from_str(r#"[12, "12"]"#).expect("values decode");
        assert_eq!(
            values,
            vec![ProgressValue::Number(12), ProgressValue::Text("12".to_owned())]
        );
    }
}
