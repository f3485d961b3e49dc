//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **anilist**: reqwest-backed `CatalogSource` over AniList GraphQL
//! - **persistence**: JSON-file `IdentityStore` with atomic writes
//!
//! Adapters are thin translators between domain types and wire or file
//! formats. They contain no session logic.

pub mod anilist;
pub mod persistence;
