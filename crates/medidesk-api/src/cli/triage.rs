//! Triage and booking command.
//!
//! Symptoms → specialist table → pick a specialist → slot list → pick a
//! slot → confirm. The flow renders every step through the terminal surface;
//! this module only reads the rendered controls back and lets the user choose
//! one with `dialoguer::Select`.

use anyhow::Result;
use console::style;
use dialoguer::{Input, Select};

use medidesk_core::render;
use medidesk_core::triage::{ActionOutcome, BookingOutcome, SlotsOutcome, TriageOutcome};
use medidesk_core::view::{Action, RegionId, ViewNode};
use medidesk_types::triage::NaiveDate;

use crate::state::{AppState, ConcreteTriageFlow};

/// Run the triage flow, then walk the user through booking.
pub async fn run_triage(
    state: &AppState,
    symptoms: Option<String>,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let symptoms = match symptoms {
        Some(symptoms) => symptoms,
        None if json => anyhow::bail!("symptoms are required with --json"),
        None => Input::<String>::new()
            .with_prompt("Describe your symptoms")
            .allow_empty(true)
            .interact_text()?,
    };

    let flow = state.triage_flow(date);
    let outcome = flow.start_triage(&symptoms).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?);
        return Ok(());
    }
    if !matches!(outcome, TriageOutcome::Matched(_)) {
        return Ok(());
    }
    book(state, &flow).await
}

/// Let the user pick a specialist and a slot until a booking is confirmed or
/// they cancel.
async fn book(state: &AppState, flow: &ConcreteTriageFlow) -> Result<()> {
    let results = state
        .surface
        .store()
        .region(&RegionId::triage_results())
        .unwrap_or_default();
    let doctors = card_choices(&results);

    loop {
        let mut items: Vec<&str> = doctors.iter().map(|(label, _)| label.as_str()).collect();
        items.push("Cancel");
        let selection = Select::new()
            .with_prompt(render::SELECT_DOCTOR)
            .items(&items)
            .default(0)
            .interact()?;
        let Some((_, load_slots)) = doctors.get(selection) else {
            return Ok(());
        };

        let ActionOutcome::Slots(SlotsOutcome::Loaded(_)) = flow.dispatch(load_slots).await else {
            continue;
        };
        let Action::LoadSlots { doctor_id, .. } = load_slots else {
            continue;
        };

        let rendered = state
            .surface
            .store()
            .region(&RegionId::slots_container(*doctor_id))
            .unwrap_or_default();
        let slots = slot_choices(&rendered);
        if slots.is_empty() {
            println!("  {}", style("No open slots. Pick another specialist.").dim());
            continue;
        }

        let mut items: Vec<&str> = slots.iter().map(|(label, _)| label.as_str()).collect();
        items.push("< Back");
        let selection = Select::new()
            .with_prompt(render::SLOTS_HEADING)
            .items(&items)
            .default(0)
            .interact()?;
        let Some((_, confirm)) = slots.get(selection) else {
            continue;
        };

        if let ActionOutcome::Booking(BookingOutcome::Confirmed(_)) = flow.dispatch(confirm).await {
            return Ok(());
        }
    }
}

/// `(label, action)` for the "view slots" control of every rendered card.
fn card_choices(nodes: &[ViewNode]) -> Vec<(String, Action)> {
    nodes
        .iter()
        .filter_map(|node| {
            let ViewNode::Card {
                title, subtitle, ..
            } = node
            else {
                return None;
            };
            node.buttons().into_iter().find_map(|button| match button {
                ViewNode::Button {
                    action: action @ Action::LoadSlots { .. },
                    enabled: true,
                    ..
                } => Some((format!("{title} ({subtitle})"), action.clone())),
                _ => None,
            })
        })
        .collect()
}

/// `(label, action)` for every selectable slot control.
fn slot_choices(nodes: &[ViewNode]) -> Vec<(String, Action)> {
    nodes
        .iter()
        .filter_map(|node| match node {
            ViewNode::Button {
                label,
                action: action @ Action::ConfirmBooking(_),
                enabled: true,
            } => Some((label.clone(), action.clone())),
            _ => None,
        })
        .collect()
}

/// Machine-readable form of a triage outcome.
pub fn outcome_json(outcome: &TriageOutcome) -> serde_json::Value {
    match outcome {
        TriageOutcome::Rejected => serde_json::json!({
            "status": "rejected",
            "message": render::SYMPTOMS_REQUIRED,
        }),
        TriageOutcome::Matched(doctors) => serde_json::json!({
            "status": "matched",
            "doctors": doctors,
        }),
        TriageOutcome::NoMatch => serde_json::json!({
            "status": "no_match",
            "message": render::NO_MATCH,
        }),
        TriageOutcome::ConnectionError => serde_json::json!({
            "status": "connection_error",
            "message": render::TRIAGE_ERROR,
        }),
    }
}
