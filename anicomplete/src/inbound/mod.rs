//! Inbound adapters that translate user actions into session calls.
//!
//! The terminal surface lives under [`terminal`]; the binary only parses
//! arguments and wires adapters.

pub mod terminal;
