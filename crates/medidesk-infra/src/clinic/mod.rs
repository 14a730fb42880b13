//! HTTP access to the clinic server.

pub mod client;

pub use client::HttpClinicTransport;
