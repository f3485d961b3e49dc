//! Tracked-user identity.

use std::fmt;

use serde::{Deserialize, Serialize};

const DEFAULT_ACCENT: &str = "default";

/// Profile accent colour reported by AniList.
///
/// Serialised as a bare string: `"default"` or the colour token itself
/// (`"blue"`, `"#3db4f2"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccentColor {
    /// No colour preference; surfaces fall back to their own palette.
    #[default]
    Default,
    /// A colour name or hex value chosen on the user's profile.
    Token(String),
}

impl AccentColor {
    /// Build an accent from a raw profile value, treating blanks as default.
    pub fn from_profile(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Default,
            Some(value) => Self::from(value.to_owned()),
        }
    }

    /// Borrow the colour token, or `None` for the default accent.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Default => None,
            Self::Token(token) => Some(token.as_str()),
        }
    }
}

impl From<String> for AccentColor {
    fn from(value: String) -> Self {
        if value == DEFAULT_ACCENT {
            Self::Default
        } else {
            Self::Token(value)
        }
    }
}

impl From<AccentColor> for String {
    fn from(value: AccentColor) -> Self {
        match value {
            AccentColor::Default => DEFAULT_ACCENT.to_owned(),
            AccentColor::Token(token) => token,
        }
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token().unwrap_or(DEFAULT_ACCENT))
    }
}

/// The AniList user whose completed list is being reconciled.
///
/// ## Invariants
/// - `user_id == 0` means the identity is unresolved.
/// - A resolved identity has `user_id > 0` and a non-empty `username`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Name the identity was resolved from.
    pub username: String,
    /// AniList numeric user id; zero while unresolved.
    pub user_id: u64,
    /// Profile accent colour.
    pub accent_color: AccentColor,
}

impl Identity {
    /// The unresolved identity every session starts from.
    ///
    /// # Examples
    /// ```
    /// use anicomplete::domain::Identity;
    ///
    /// let identity = Identity::empty();
    /// assert!(!identity.is_resolved());
    /// assert_eq!(identity.user_id, 0);
    /// ```
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a resolved identity, rejecting values that break the invariants.
    pub fn resolved(
        username: impl Into<String>,
        user_id: u64,
        accent_color: AccentColor,
    ) -> Option<Self> {
        let identity = Self {
            username: username.into(),
            user_id,
            accent_color,
        };
        identity.is_resolved().then_some(identity)
    }

    /// Whether this identity has been confirmed by the catalog service.
    pub fn is_resolved(&self) -> bool {
        self.user_id > 0 && !self.username.is_empty()
    }
}
