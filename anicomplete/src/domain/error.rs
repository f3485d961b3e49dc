//! Session-level error taxonomy.
//!
//! Identity errors are hard: they move the session to `Failed`. List errors
//! after a resolved identity are soft: previous data stays on screen and the
//! error is shown as a transient notice.

use thiserror::Error;

use super::ports::{CatalogSourceError, IdentityStoreError};

/// Errors surfaced by the session controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The lookup completed but the catalog has no such user.
    #[error("could not validate username \"{username}\": no such user")]
    UserNotFound {
        /// Name that was looked up.
        username: String,
    },

    /// Network failure, timeout, or non-success HTTP status.
    #[error("could not reach the catalog service: {message}")]
    Transport {
        /// Transport diagnostic.
        message: String,
    },

    /// Success status, but the payload did not match the expected schema.
    #[error("catalog service sent an unexpected response: {message}")]
    MalformedResponse {
        /// Decode diagnostic.
        message: String,
    },

    /// A list refresh failed after the identity was already resolved.
    #[error("could not refresh the completed list, showing previous results: {message}")]
    QuietFetchFailure {
        /// Underlying failure, already rendered.
        message: String,
    },

    /// A list refresh was requested without a resolved identity.
    #[error("no resolved username; set one before refreshing")]
    NoIdentity,

    /// The identity store could not be written or wiped.
    #[error("could not update the saved username: {message}")]
    Persistence {
        /// Store diagnostic.
        message: String,
    },

    /// Session state could not be accessed (a previous holder panicked).
    #[error("session state unavailable: {message}")]
    StateUnavailable {
        /// Lock diagnostic.
        message: String,
    },
}

/// How prominently a surfaced error should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    /// Blocks progress until the user acts again.
    Hard,
    /// Informational; existing data is still valid.
    Transient,
}

/// A user-visible error message held in the session snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Display weight.
    pub severity: NoticeSeverity,
    /// Message shown to the user.
    pub message: String,
}

impl SessionError {
    /// Severity the presentation surface should use for this error.
    pub fn severity(&self) -> NoticeSeverity {
        match self {
            Self::QuietFetchFailure { .. } | Self::Persistence { .. } | Self::NoIdentity => {
                NoticeSeverity::Transient
            }
            Self::UserNotFound { .. }
            | Self::Transport { .. }
            | Self::MalformedResponse { .. }
            | Self::StateUnavailable { .. } => NoticeSeverity::Hard,
        }
    }

    /// Wrap this error as a notice for the snapshot.
    pub fn to_notice(&self) -> Notice {
        Notice {
            severity: self.severity(),
            message: self.to_string(),
        }
    }

    /// Downgrade a list-fetch failure into a [`SessionError::QuietFetchFailure`].
    pub fn quiet(source: &CatalogSourceError) -> Self {
        Self::QuietFetchFailure {
            message: source.to_string(),
        }
    }

    pub(crate) fn state_unavailable() -> Self {
        Self::StateUnavailable {
            message: "session state lock poisoned".to_owned(),
        }
    }
}

impl From<CatalogSourceError> for SessionError {
    fn from(value: CatalogSourceError) -> Self {
        match value {
            CatalogSourceError::UserNotFound { username } => Self::UserNotFound { username },
            CatalogSourceError::Decode { message } => Self::MalformedResponse { message },
            CatalogSourceError::Transport { message } | CatalogSourceError::Timeout { message } => {
                Self::Transport { message }
            }
        }
    }
}

impl From<IdentityStoreError> for SessionError {
    fn from(value: IdentityStoreError) -> Self {
        Self::Persistence {
            message: value.to_string(),
        }
    }
}
