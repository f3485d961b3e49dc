//! Completed-manga discrepancy reports for AniList users.
//!
//! The crate is laid out as a small hexagon: `domain` owns the session state
//! machine, the mismatch projection, and the ports it drives; `outbound`
//! implements those ports against AniList and the local filesystem; `inbound`
//! renders session state for the terminal binary.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
