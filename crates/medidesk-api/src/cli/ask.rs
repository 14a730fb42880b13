//! One-shot question to the clinic assistant.

use anyhow::Result;

use medidesk_core::chat::ChatOutcome;
use medidesk_core::view::RegionId;

use crate::state::AppState;

/// Send one question and print the reply (or the transcript as JSON).
///
/// A failed request is still a successful command: the fixed error notice is
/// the reply, as it would be in the chat window.
pub async fn ask(state: &AppState, query: &str, json: bool) -> Result<()> {
    let flow = state.chat_flow();
    let outcome = flow.send_message(query).await;

    if !json {
        if outcome == ChatOutcome::Ignored {
            anyhow::bail!("question is empty");
        }
        return Ok(());
    }

    let (status, text, html) = match &outcome {
        ChatOutcome::Ignored => ("ignored", None, None),
        ChatOutcome::Answered { reply, .. } => {
            ("answered", Some(reply.to_string()), Some(reply.to_html()))
        }
        ChatOutcome::Failed { token } => (
            "failed",
            None,
            state.surface.store().region_html(&RegionId::placeholder(*token)),
        ),
    };

    let report = serde_json::json!({
        "status": status,
        "token": outcome.token(),
        "text": text,
        "html": html,
        "transcript": state.surface.store().transcript(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
