//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod catalog_source;
mod identity_store;

#[cfg(test)]
pub use catalog_source::MockCatalogSource;
pub use catalog_source::{CatalogSource, CatalogSourceError, FixtureCatalogSource, ResolvedUser};
#[cfg(test)]
pub use identity_store::MockIdentityStore;
pub use identity_store::{IdentityStore, IdentityStoreError, InMemoryIdentityStore};
