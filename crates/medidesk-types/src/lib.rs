//! Shared domain and wire types for MediDesk.
//!
//! This crate contains the types exchanged with the clinic server (chat,
//! specialist matching, slots), the booking request handled locally, client
//! configuration, and the client error type.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod triage;
