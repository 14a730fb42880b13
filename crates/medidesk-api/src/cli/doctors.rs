//! Specialist directory command.

use anyhow::Result;
use console::style;

use medidesk_core::triage::TriageOutcome;

use crate::state::AppState;

use super::triage::outcome_json;

/// List every specialist. Cards are printed by the terminal surface.
pub async fn list_doctors(state: &AppState, json: bool) -> Result<()> {
    let flow = state.triage_flow(None);
    let outcome = flow.list_all_specialists().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?);
        return Ok(());
    }

    if let TriageOutcome::Matched(doctors) = &outcome {
        println!();
        println!(
            "  {} specialist{}",
            style(doctors.len()).bold(),
            if doctors.len() == 1 { "" } else { "s" }
        );
        println!(
            "  {}",
            style("Book one with: medidesk triage \"<symptoms>\"").dim()
        );
        println!();
    }
    Ok(())
}
