//! ClinicTransport trait definition.
//!
//! The request seam between the flows and the clinic server. Implementations
//! live in medidesk-infra (e.g., `HttpClinicTransport`). Uses native async fn
//! in traits (RPITIT).

use medidesk_types::chat::{ChatReply, ChatRequest};
use medidesk_types::error::ClientError;
use medidesk_types::triage::{SlotsReply, SlotsRequest, SpecialistsReply, SpecialistsRequest};

/// Request/response access to the clinic server.
///
/// Every method resolves to `Ok` only when the reply matched the expected
/// shape; malformed bodies are errors, the same as network failures.
pub trait ClinicTransport: Send + Sync {
    /// `POST /chat`.
    fn chat(
        &self,
        request: &ChatRequest,
    ) -> impl std::future::Future<Output = Result<ChatReply, ClientError>> + Send;

    /// `POST /get_specialists`.
    fn specialists(
        &self,
        request: &SpecialistsRequest,
    ) -> impl std::future::Future<Output = Result<SpecialistsReply, ClientError>> + Send;

    /// `GET /get_all_doctors`.
    fn all_specialists(
        &self,
    ) -> impl std::future::Future<Output = Result<SpecialistsReply, ClientError>> + Send;

    /// `POST /get_slots`.
    fn slots(
        &self,
        request: &SlotsRequest,
    ) -> impl std::future::Future<Output = Result<SlotsReply, ClientError>> + Send;
}
