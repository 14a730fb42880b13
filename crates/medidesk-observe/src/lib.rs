//! Observability for MediDesk: subscriber setup and span field names.

pub mod attrs;
pub mod tracing_setup;
