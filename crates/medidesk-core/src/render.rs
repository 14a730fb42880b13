//! Pure render functions: typed models in, view nodes out.
//!
//! Nothing here touches a surface; flows decide where the output goes.

use medidesk_types::chat::MessageRole;
use medidesk_types::triage::{BookingRequest, Slot, Specialist};

use crate::format::FormattedText;
use crate::token::RequestToken;
use crate::view::{Action, Detail, NoticeLevel, RegionId, ViewNode};

pub const CHAT_PENDING: &str = "Consulting Medical Database...";
pub const CHAT_ERROR: &str = "❌ Error: Could not reach the medical server.";
pub const SYMPTOMS_REQUIRED: &str = "Please describe your symptoms first.";
pub const TRIAGE_PENDING: &str = "AI is analyzing symptoms and matching specialists...";
pub const DIRECTORY_PENDING: &str = "Loading specialists...";
pub const NO_MATCH: &str =
    "No matching specialist found for these symptoms. Please visit General OPD.";
pub const TRIAGE_ERROR: &str = "Connection error in triage system.";
pub const SELECT_DOCTOR: &str = "Select Doctor & View Slots";
pub const SLOTS_PENDING: &str = "Generating slots...";
pub const SLOTS_HEADING: &str = "Select a time:";
pub const SLOTS_FAILED: &str = "Failed to load slots.";

pub fn user_message(text: &str) -> ViewNode {
    ViewNode::Message {
        role: MessageRole::User,
        id: None,
        children: vec![ViewNode::text(text)],
    }
}

/// Assistant entry shown while a reply is pending; addressable by `token`.
pub fn assistant_placeholder(token: RequestToken) -> ViewNode {
    assistant_entry(
        token,
        vec![ViewNode::Spinner {
            caption: CHAT_PENDING.to_string(),
        }],
    )
}

/// Assistant entry addressable by `token`, holding `content`.
pub fn assistant_entry(token: RequestToken, content: Vec<ViewNode>) -> ViewNode {
    ViewNode::Message {
        role: MessageRole::Assistant,
        id: Some(RegionId::placeholder(token)),
        children: content,
    }
}

pub fn assistant_reply(reply: &FormattedText) -> Vec<ViewNode> {
    reply.nodes().to_vec()
}

pub fn chat_error() -> Vec<ViewNode> {
    vec![ViewNode::text(CHAT_ERROR)]
}

pub fn triage_loading() -> Vec<ViewNode> {
    vec![ViewNode::Spinner {
        caption: TRIAGE_PENDING.to_string(),
    }]
}

pub fn directory_loading() -> Vec<ViewNode> {
    vec![ViewNode::Spinner {
        caption: DIRECTORY_PENDING.to_string(),
    }]
}

/// One card per doctor, each with its own empty slot container.
pub fn specialist_card(doctor: &Specialist) -> ViewNode {
    ViewNode::Card {
        title: doctor.name.clone(),
        subtitle: doctor.specialization.clone(),
        details: vec![
            Detail::new("Shift", doctor.time.clone()),
            Detail::new("Room", doctor.room.to_string()),
            Detail::new("Fee", doctor.fee.to_string()),
        ],
        children: vec![
            ViewNode::Button {
                label: SELECT_DOCTOR.to_string(),
                action: Action::LoadSlots {
                    doctor_id: doctor.id,
                    doctor_name: doctor.name.clone(),
                },
                enabled: true,
            },
            ViewNode::region(RegionId::slots_container(doctor.id), Vec::new()),
        ],
    }
}

pub fn specialist_cards(doctors: &[Specialist]) -> Vec<ViewNode> {
    doctors.iter().map(specialist_card).collect()
}

pub fn no_match() -> Vec<ViewNode> {
    vec![ViewNode::Notice {
        level: NoticeLevel::Warning,
        text: NO_MATCH.to_string(),
    }]
}

pub fn triage_error() -> Vec<ViewNode> {
    vec![ViewNode::Notice {
        level: NoticeLevel::Danger,
        text: TRIAGE_ERROR.to_string(),
    }]
}

pub fn slots_loading() -> Vec<ViewNode> {
    vec![ViewNode::Spinner {
        caption: SLOTS_PENDING.to_string(),
    }]
}

/// Heading plus one control per slot. Booked slots are shown disabled.
pub fn slot_picker(doctor_name: &str, slots: &[Slot]) -> Vec<ViewNode> {
    let mut nodes = Vec::with_capacity(slots.len() + 1);
    nodes.push(ViewNode::Heading {
        text: SLOTS_HEADING.to_string(),
    });
    nodes.extend(slots.iter().map(|slot| ViewNode::Button {
        label: slot.time.clone(),
        action: Action::ConfirmBooking(BookingRequest::new(doctor_name, slot.time.clone())),
        enabled: !slot.is_booked,
    }));
    nodes
}

pub fn slots_failed() -> Vec<ViewNode> {
    vec![ViewNode::Notice {
        level: NoticeLevel::Inline,
        text: SLOTS_FAILED.to_string(),
    }]
}

pub fn confirm_prompt(booking: &BookingRequest) -> String {
    format!(
        "Confirm appointment with {} at {}?",
        booking.doctor_name, booking.slot_time
    )
}

pub fn booking_acknowledgment(booking: &BookingRequest) -> String {
    format!(
        "✅ Appointment Confirmed!\nDoctor: {}\nTime: {}\nPlease arrive 10 minutes early.",
        booking.doctor_name, booking.slot_time
    )
}
