//! Triage flow: symptoms → specialist cards → slots → local confirmation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use medidesk_types::error::ClientError;
use medidesk_types::triage::{
    BookingRequest, NaiveDate, Slot, SlotsRequest, Specialist, SpecialistsReply,
    SpecialistsRequest,
};

use crate::render;
use crate::transport::ClinicTransport;
use crate::view::{Action, RegionId, Surface};

/// Result of a specialist search or directory listing.
#[derive(Debug, Clone, PartialEq)]
pub enum TriageOutcome {
    /// Symptoms were empty; the user was told and nothing was sent.
    Rejected,
    /// One card was rendered per specialist.
    Matched(Vec<Specialist>),
    /// Non-success status or an empty list.
    NoMatch,
    ConnectionError,
}

/// Result of loading one specialist's slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotsOutcome {
    Loaded(Vec<Slot>),
    Failed,
    /// No card for this doctor is mounted; nothing was sent.
    NoCard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    Confirmed(BookingRequest),
    Declined,
}

/// Result of activating a rendered control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Slots(SlotsOutcome),
    Booking(BookingOutcome),
}

/// Drives the triage/booking sequence against the `triage-results` region.
///
/// A new search overwrites the result area; an in-flight search is not
/// cancelled, so the last reply to arrive wins the region. Slot lists are
/// per card and never touch other cards.
pub struct TriageFlow<T: ClinicTransport, S: Surface> {
    transport: Arc<T>,
    surface: Arc<S>,
    slot_date: Option<NaiveDate>,
}

impl<T: ClinicTransport, S: Surface> TriageFlow<T, S> {
    pub fn new(transport: Arc<T>, surface: Arc<S>) -> Self {
        Self {
            transport,
            surface,
            slot_date: None,
        }
    }

    /// Ask the server for availability on `date` when loading slots.
    pub fn with_slot_date(mut self, date: Option<NaiveDate>) -> Self {
        self.slot_date = date;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Match `symptoms` to specialists and render their cards.
    pub async fn start_triage(&self, symptoms: &str) -> TriageOutcome {
        let symptoms = symptoms.trim();
        if symptoms.is_empty() {
            self.surface.alert(render::SYMPTOMS_REQUIRED);
            return TriageOutcome::Rejected;
        }

        self.surface
            .replace(&RegionId::triage_results(), render::triage_loading());

        debug!("Requesting specialist match");
        let request = SpecialistsRequest {
            symptoms: symptoms.to_string(),
        };
        let reply = self.transport.specialists(&request).await;
        self.show_specialists(reply)
    }

    /// Render every specialist the clinic lists, regardless of symptoms.
    pub async fn list_all_specialists(&self) -> TriageOutcome {
        self.surface
            .replace(&RegionId::triage_results(), render::directory_loading());

        debug!("Requesting specialist directory");
        let reply = self.transport.all_specialists().await;
        self.show_specialists(reply)
    }

    fn show_specialists(&self, reply: Result<SpecialistsReply, ClientError>) -> TriageOutcome {
        let results = RegionId::triage_results();
        match reply {
            Ok(reply) if !reply.doctors().is_empty() => {
                let doctors = reply.doctors().to_vec();
                info!(count = doctors.len(), "Specialists matched");
                self.surface
                    .replace(&results, render::specialist_cards(&doctors));
                TriageOutcome::Matched(doctors)
            }
            Ok(reply) => {
                info!(status = %reply.status, message = ?reply.message, "No specialist matched");
                self.surface.replace(&results, render::no_match());
                TriageOutcome::NoMatch
            }
            Err(e) => {
                warn!(error = %e, "Specialist request failed");
                self.surface.replace(&results, render::triage_error());
                TriageOutcome::ConnectionError
            }
        }
    }

    /// Load and render the slots of one specialist inside its card.
    pub async fn load_slots(&self, doctor_id: i64, doctor_name: &str) -> SlotsOutcome {
        let container = RegionId::slots_container(doctor_id);
        if !self.surface.replace(&container, render::slots_loading()) {
            warn!(doctor_id, "No card mounted for doctor, not loading slots");
            return SlotsOutcome::NoCard;
        }

        debug!(doctor_id, date = ?self.slot_date, "Requesting slots");
        let request = SlotsRequest {
            doc_id: doctor_id,
            date: self.slot_date,
        };
        match self.transport.slots(&request).await {
            Ok(reply) if reply.is_success() => {
                let slots = reply.slots.unwrap_or_default();
                self.surface
                    .replace(&container, render::slot_picker(doctor_name, &slots));
                SlotsOutcome::Loaded(slots)
            }
            Ok(reply) => {
                info!(doctor_id, status = %reply.status, message = ?reply.message, "Slots unavailable");
                self.surface.replace(&container, render::slots_failed());
                SlotsOutcome::Failed
            }
            Err(e) => {
                warn!(doctor_id, error = %e, "Slot request failed");
                self.surface.replace(&container, render::slots_failed());
                SlotsOutcome::Failed
            }
        }
    }

    /// Ask the user to confirm `(doctor_name, slot_time)` and acknowledge it.
    ///
    /// Nothing is sent to the server.
    pub fn confirm_booking(&self, doctor_name: &str, slot_time: &str) -> BookingOutcome {
        let booking = BookingRequest::new(doctor_name, slot_time);
        if !self.surface.confirm(&render::confirm_prompt(&booking)) {
            return BookingOutcome::Declined;
        }
        self.surface
            .alert(&render::booking_acknowledgment(&booking));
        info!(doctor = %booking.doctor_name, slot = %booking.slot_time, "Appointment confirmed locally");
        BookingOutcome::Confirmed(booking)
    }

    /// Run the handler a rendered control is bound to.
    pub async fn dispatch(&self, action: &Action) -> ActionOutcome {
        match action {
            Action::LoadSlots {
                doctor_id,
                doctor_name,
            } => ActionOutcome::Slots(self.load_slots(*doctor_id, doctor_name).await),
            Action::ConfirmBooking(booking) => ActionOutcome::Booking(
                self.confirm_booking(&booking.doctor_name, &booking.slot_time),
            ),
        }
    }
}
