//! Driven port for the remote catalog service.
//!
//! The domain owns both query shapes and their decoded results; adapters only
//! handle transport and wire formats.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{AccentColor, CatalogEntry};

/// Result of a successful user lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUser {
    /// AniList user id, always greater than zero.
    pub user_id: u64,
    /// Profile accent colour.
    pub accent_color: AccentColor,
}

define_port_error! {
    /// Errors surfaced while talking to the catalog service.
    pub enum CatalogSourceError {
        /// Network transport failed or the service answered with a non-success status.
        Transport { message: String } =>
            "catalog transport failed: {message}",
        /// The request exceeded the configured client timeout.
        Timeout { message: String } =>
            "catalog request timed out: {message}",
        /// The lookup succeeded but named no user.
        UserNotFound { username: String } =>
            "no catalog user named \"{username}\"",
        /// The response had a success status but an unexpected shape.
        Decode { message: String } =>
            "catalog response decode failed: {message}",
    }
}

/// Port for the two catalog queries the session needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Look a user up by name.
    ///
    /// The username is passed through as opaque text.
    async fn resolve_user(&self, username: &str) -> Result<ResolvedUser, CatalogSourceError>;

    /// Fetch the entries of the user's list named exactly `"Completed"`.
    ///
    /// A collection without that list yields an empty vector.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use anicomplete::domain::ports::{CatalogSource, FixtureCatalogSource};
    ///
    /// let source = FixtureCatalogSource;
    /// let entries = source.fetch_completed_list("reader", 42).await?;
    /// assert!(entries.is_empty());
    /// # Ok::<(), anicomplete::domain::ports::CatalogSourceError>(())
    /// ```
    async fn fetch_completed_list(
        &self,
        username: &str,
        user_id: u64,
    ) -> Result<Vec<CatalogEntry>, CatalogSourceError>;
}

/// Fixture source that knows no users and returns empty lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureCatalogSource;

#[async_trait]
impl CatalogSource for FixtureCatalogSource {
    async fn resolve_user(&self, username: &str) -> Result<ResolvedUser, CatalogSourceError> {
        Err(CatalogSourceError::user_not_found(username))
    }

    async fn fetch_completed_list(
        &self,
        _username: &str,
        _user_id: u64,
    ) -> Result<Vec<CatalogEntry>, CatalogSourceError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_source_reports_unknown_users() {
        let error = FixtureCatalogSource
            .resolve_user("nobody")
            .await
            .expect_err("fixture knows no users");
        assert_eq!(error, CatalogSourceError::user_not_found("nobody"));
        assert_eq!(error.to_string(), "no catalog user named \"nobody\"");
    }

    #[tokio::test]
    async fn fixture_source_returns_empty_lists() {
        let entries = FixtureCatalogSource
            .fetch_completed_list("reader", 42)
            .await
            .expect("fixture list succeeds");
        assert!(entries.is_empty());
    }
}
