//! Span and event field names for clinic server requests.
//!
//! Used as constant field names (`{ CLINIC_ENDPOINT } = ...`) in
//! `tracing::info_span!` so every request span carries the same keys.

/// Logical endpoint name (one of the `OP_*` values below).
pub const CLINIC_ENDPOINT: &str = "clinic.endpoint";

/// HTTP method used for the request.
pub const CLINIC_HTTP_METHOD: &str = "clinic.http.method";

/// Full request URL.
pub const CLINIC_URL: &str = "clinic.url";

/// HTTP status code of the reply.
pub const CLINIC_HTTP_STATUS: &str = "clinic.http.status";

/// `status` field of a triage reply (`"success"`, `"error"`, ...).
pub const CLINIC_REPLY_STATUS: &str = "clinic.reply.status";

pub const CLINIC_DOCTOR_ID: &str = "clinic.doctor_id";

// --- Endpoint names ---

pub const OP_CHAT: &str = "chat";
pub const OP_SPECIALISTS: &str = "get_specialists";
pub const OP_ALL_SPECIALISTS: &str = "get_all_doctors";
pub const OP_SLOTS: &str = "get_slots";
