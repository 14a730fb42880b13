//! Chat and triage flows for the MediDesk clinic client.
//!
//! This crate holds everything that can be tested without a network or a
//! screen: the reply formatter, the pure render functions, the view tree and
//! its in-memory surface, and the two flows that orchestrate requests through
//! the [`transport::ClinicTransport`] port. It depends only on
//! `medidesk-types` -- never on `medidesk-infra` or any HTTP crate.

pub mod chat;
pub mod format;
pub mod render;
pub mod token;
pub mod transport;
pub mod triage;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;
