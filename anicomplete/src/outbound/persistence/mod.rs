//! Local persistence for the session identity.

mod atomic_io;
mod json_identity_store;

pub use json_identity_store::{IDENTITY_FILE_NAME, JsonFileIdentityStore};
