//! AniList outbound adapter.
//!
//! This module provides a thin HTTP implementation of the `CatalogSource`
//! port over AniList's GraphQL endpoint.

mod dto;
mod http_source;

pub use http_source::{ANILIST_ENDPOINT, AniListHttpSource};
