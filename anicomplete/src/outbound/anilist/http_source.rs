//! Reqwest-backed AniList catalog adapter.
//!
//! This adapter owns transport details only: GraphQL query text, HTTP error
//! mapping, and JSON decoding into domain entries.

use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use super::dto::{ListResponseDto, UserLookup, UserResponseDto};
use crate::domain::CatalogEntry;
use crate::domain::ports::{CatalogSource, CatalogSourceError, ResolvedUser};

/// Public AniList GraphQL endpoint.
pub const ANILIST_ENDPOINT: &str = "https://graphql.anilist.co";

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
}

/// Catalog adapter that POSTs GraphQL queries to one AniList endpoint.
pub struct AniListHttpSource {
    client: Client,
    endpoint: Url,
    user_agent: String,
}

impl AniListHttpSource {
    /// Build an adapter. `timeout` of `None` leaves requests unbounded.
    /// ```rust,ignore
    /// let source = AniListHttpSource::new(endpoint, None, "anicomplete/0.1.0")?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        timeout: Option<Duration>,
        user_agent: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint,
            user_agent: user_agent.into(),
        })
    }

    async fn post_query(&self, query: &str) -> Result<(StatusCode, Vec<u8>), CatalogSourceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&GraphQlRequest { query })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl CatalogSource for AniListHttpSource {
    async fn resolve_user(&self, username: &str) -> Result<ResolvedUser, CatalogSourceError> {
        let (status, body) = self.post_query(&build_user_query(username)).await?;
        if status == StatusCode::NOT_FOUND {
            debug!(username, "AniList reported no such user");
            return Err(CatalogSourceError::user_not_found(username));
        }
        if !status.is_success() {
            let error = map_status_error(status, &body);
            debug!(%error, username, "user lookup failed");
            return Err(error);
        }

        match parse_user(&body)? {
            UserLookup::Found(user) => Ok(user),
            UserLookup::Missing => Err(CatalogSourceError::user_not_found(username)),
        }
    }

    async fn fetch_completed_list(
        &self,
        username: &str,
        user_id: u64,
    ) -> Result<Vec<CatalogEntry>, CatalogSourceError> {
        let (status, body) = self
            .post_query(&build_list_query(username, user_id))
            .await?;
        if !status.is_success() {
            let error = map_status_error(status, &body);
            debug!(%error, username, user_id, "completed list fetch failed");
            return Err(error);
        }
        parse_entries(&body)
    }
}

fn parse_user(body: &[u8]) -> Result<UserLookup, CatalogSourceError> {
    let decoded: UserResponseDto = serde_json::from_slice(body).map_err(|error| {
        CatalogSourceError::decode(format!("invalid AniList user payload: {error}"))
    })?;
    decoded.into_lookup().map_err(CatalogSourceError::decode)
}

fn parse_entries(body: &[u8]) -> Result<Vec<CatalogEntry>, CatalogSourceError> {
    let decoded: ListResponseDto = serde_json::from_slice(body).map_err(|error| {
        CatalogSourceError::decode(format!("invalid AniList list payload: {error}"))
    })?;
    decoded
        .into_completed_entries()
        .map_err(CatalogSourceError::decode)
}

fn build_user_query(username: &str) -> String {
    format!(
        "query {{\n  User(name: \"{name}\") {{\n    id\n    options {{\n      profileColor\n    }}\n  }}\n}}",
        name = escape_quoted(username)
    )
}

fn build_list_query(username: &str, user_id: u64) -> String {
    format!(
        concat!(
            "query {{\n",
            "  MediaListCollection(userName: \"{name}\", userId: {user_id}, type: MANGA, status: COMPLETED) {{\n",
            "    lists {{\n",
            "      name\n",
            "      entries {{\n",
            "        status\n",
            "        progress\n",
            "        media {{\n",
            "          title {{\n            english\n            romaji\n          }}\n",
            "          chapters\n",
            "          siteUrl\n",
            "          coverImage {{\n            large\n          }}\n",
            "        }}\n",
            "      }}\n",
            "    }}\n",
            "  }}\n",
            "}}"
        ),
        name = escape_quoted(username),
        user_id = user_id,
    )
}

/// Escape text for a double-quoted GraphQL string literal.
fn escape_quoted(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => escaped.push_str(r"\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str(r"\n"),
            '\r' => escaped.push_str(r"\r"),
            '\t' => escaped.push_str(r"\t"),
            control if control.is_control() => {
                let _ = write!(escaped, "\\u{:04x}", u32::from(control));
            }
            other => escaped.push(other),
        }
    }
    escaped
}

fn map_transport_error(error: reqwest::Error) -> CatalogSourceError {
    if error.is_timeout() {
        CatalogSourceError::timeout(error.to_string())
    } else {
        CatalogSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CatalogSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CatalogSourceError::timeout(message)
        }
        _ => CatalogSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
