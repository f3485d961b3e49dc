//! Domain model, projection, session state machine, and ports.
//!
//! Nothing in this module performs I/O directly; network and filesystem
//! access go through the traits in [`ports`].
//!
//! Public surface:
//! - [`Identity`] and [`AccentColor`]: the tracked user.
//! - [`CatalogEntry`] and [`ProgressValue`]: one completed-list item.
//! - [`project`]: entries to [`MismatchView`].
//! - [`SessionController`]: the identity-resolution state machine.

pub mod error;
pub mod ports;

mod catalog_entry;
mod identity;
mod mismatch;
mod session;

pub use self::catalog_entry::{CatalogEntry, ProgressValue};
pub use self::error::{Notice, NoticeSeverity, SessionError};
pub use self::identity::{AccentColor, Identity};
pub use self::mismatch::{MismatchRow, MismatchView, compare_titles, project};
pub use self::session::{SessionController, SessionSnapshot, SessionState, Transition};
