//! Infrastructure layer for MediDesk.
//!
//! Contains the reqwest implementation of the `ClinicTransport` port defined
//! in `medidesk-core` and the `config.toml` loader.

pub mod clinic;
pub mod config;
