use std::fmt;

use serde::Serialize;

use crate::token::RequestToken;

/// Address of a mutable part of the surface.
///
/// Region ids keep the names the clinic page uses so the HTML output stays
/// addressable by the same selectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    /// The chat transcript.
    pub fn chat_box() -> Self {
        Self("chat-box".to_string())
    }

    /// Where specialist cards (or the triage notices) go.
    pub fn triage_results() -> Self {
        Self("triage-results".to_string())
    }

    /// The assistant placeholder for one chat submission.
    pub fn placeholder(token: RequestToken) -> Self {
        Self(format!("ai-msg-{token}"))
    }

    /// The slot list nested inside one specialist card.
    pub fn slots_container(doctor_id: i64) -> Self {
        Self(format!("slots-container-{doctor_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this region holds one chat reply.
    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with("ai-msg-")
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
