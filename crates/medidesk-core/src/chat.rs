//! Chat flow: one request per submission, one placeholder per request.

use std::sync::Arc;

use tracing::{debug, warn};

use medidesk_types::chat::ChatRequest;

use crate::format::{FormattedText, format_medical_output};
use crate::render;
use crate::token::{RequestToken, RequestTokens};
use crate::transport::ClinicTransport;
use crate::view::{RegionId, Surface, ViewNode};

/// What happened to one `send_message` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// Input was empty after trimming; nothing was sent or rendered.
    Ignored,
    /// The placeholder now shows the formatted reply.
    Answered {
        token: RequestToken,
        reply: FormattedText,
    },
    /// The placeholder now shows the fixed error notice.
    Failed { token: RequestToken },
}

impl ChatOutcome {
    pub fn token(&self) -> Option<RequestToken> {
        match self {
            ChatOutcome::Ignored => None,
            ChatOutcome::Answered { token, .. } | ChatOutcome::Failed { token } => Some(*token),
        }
    }
}

/// Sends user messages and renders replies into the `chat-box` region.
///
/// Submissions are independent: several may be in flight at once, each
/// resolving its own placeholder. Replies can complete in any order; nothing
/// here reorders them.
pub struct ChatFlow<T: ClinicTransport, S: Surface> {
    transport: Arc<T>,
    surface: Arc<S>,
    tokens: RequestTokens,
}

impl<T: ClinicTransport, S: Surface> ChatFlow<T, S> {
    pub fn new(transport: Arc<T>, surface: Arc<S>) -> Self {
        Self {
            transport,
            surface,
            tokens: RequestTokens::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Send `query` and render the reply in place of a placeholder.
    pub async fn send_message(&self, query: &str) -> ChatOutcome {
        let query = query.trim();
        if query.is_empty() {
            return ChatOutcome::Ignored;
        }

        let chat_box = RegionId::chat_box();
        self.surface.append(&chat_box, render::user_message(query));
        self.surface.scroll_to_bottom(&chat_box);

        let token = self.tokens.issue();
        self.surface
            .append(&chat_box, render::assistant_placeholder(token));
        self.surface.scroll_to_bottom(&chat_box);

        debug!(token = %token, "Sending chat message");
        let request = ChatRequest {
            query: query.to_string(),
        };
        let outcome = match self.transport.chat(&request).await {
            Ok(reply) => {
                let reply = format_medical_output(reply.response.as_deref());
                self.resolve(token, render::assistant_reply(&reply));
                ChatOutcome::Answered { token, reply }
            }
            Err(e) => {
                warn!(token = %token, error = %e, "Chat request failed");
                self.resolve(token, render::chat_error());
                ChatOutcome::Failed { token }
            }
        };
        self.surface.scroll_to_bottom(&chat_box);
        outcome
    }

    /// Put `content` in the placeholder for `token`. If the placeholder was
    /// unmounted meanwhile (the transcript was cleared), the entry is
    /// appended again so the reply is never lost.
    fn resolve(&self, token: RequestToken, content: Vec<ViewNode>) {
        let placeholder = RegionId::placeholder(token);
        if self.surface.replace(&placeholder, content.clone()) {
            return;
        }
        debug!(token = %token, "Placeholder unmounted, appending reply");
        self.surface.append(
            &RegionId::chat_box(),
            render::assistant_entry(token, content),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{Scripted, ScriptedTransport, wire};
    use crate::view::MemorySurface;
    use medidesk_types::chat::MessageRole;
    use medidesk_types::error::ClientError;

    fn flow() -> (ChatFlow<ScriptedTransport, MemorySurface>, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new());
        let surface = Arc::new(MemorySurface::new());
        (ChatFlow::new(transport.clone(), surface), transport)
    }

    fn placeholder_html(
        flow: &ChatFlow<ScriptedTransport, MemorySurface>,
        outcome: &ChatOutcome,
    ) -> String {
        let token = outcome.token().expect("message was sent");
        flow.surface()
            .region_html(&RegionId::placeholder(token))
            .expect("placeholder mounted")
    }

    #[tokio::test]
    async fn test_empty_input_is_a_no_op() {
        let (flow, transport) = flow();
        assert_eq!(flow.send_message("   ").await, ChatOutcome::Ignored);
        assert_eq!(flow.send_message("").await, ChatOutcome::Ignored);

        assert_eq!(transport.request_count(), 0);
        assert_eq!(flow.surface().region(&RegionId::chat_box()), Some(vec![]));
        assert_eq!(flow.surface().scroll_count(&RegionId::chat_box()), 0);
    }

    #[tokio::test]
    async fn test_reply_is_formatted_into_placeholder() {
        let (flow, transport) = flow();
        transport.push_chat(Scripted::ok(wire(
            r#"{"response": "**Hi** there\n\nHow are you?"}"#,
        )));

        let outcome = flow.send_message("  hello  ").await;
        assert!(matches!(outcome, ChatOutcome::Answered { .. }));
        assert_eq!(outcome.token().map(RequestToken::value), Some(1));

        assert_eq!(
            transport.chat_requests.lock().unwrap()[0].query,
            "hello"
        );
        assert_eq!(
            placeholder_html(&flow, &outcome),
            "<strong>Hi</strong> there<br><br>How are you?"
        );

        let transcript = flow.surface().region(&RegionId::chat_box()).unwrap();
        assert_eq!(transcript.len(), 2);
        assert!(matches!(
            &transcript[0],
            ViewNode::Message { role: MessageRole::User, id: None, .. }
        ));
        assert_eq!(transcript[0].plain_text(), "hello");
    }

    #[tokio::test]
    async fn test_missing_response_field_shows_placeholder_text() {
        let (flow, transport) = flow();
        transport.push_chat(Scripted::ok(wire("{}")));

        let outcome = flow.send_message("hi").await;
        assert_eq!(placeholder_html(&flow, &outcome), "No response generated.");
    }

    #[tokio::test]
    async fn test_failure_only_touches_its_own_placeholder() {
        let (flow, transport) = flow();
        transport.push_chat(Scripted::err(ClientError::Transport(
            "connection refused".to_string(),
        )));
        transport.push_chat(Scripted::ok(wire(r#"{"response":"fine"}"#)));

        let (first, second) =
            futures_util::join!(flow.send_message("one"), flow.send_message("two"));
        assert!(matches!(first, ChatOutcome::Failed { .. }));
        assert!(matches!(second, ChatOutcome::Answered { .. }));

        assert_ne!(first.token(), second.token());
        assert_eq!(placeholder_html(&flow, &first), render::CHAT_ERROR);
        assert_eq!(placeholder_html(&flow, &second), "fine");

        let transcript = flow.surface().region_html(&RegionId::chat_box()).unwrap();
        assert_eq!(transcript.matches(render::CHAT_ERROR).count(), 1);
        assert!(!transcript.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_decode_error_is_treated_as_failure() {
        let (flow, transport) = flow();
        transport.push_chat(Scripted::err(ClientError::Decode(
            "expected value at line 1 column 1".to_string(),
        )));

        let outcome = flow.send_message("hi").await;
        assert!(matches!(outcome, ChatOutcome::Failed { .. }));
        assert_eq!(placeholder_html(&flow, &outcome), render::CHAT_ERROR);
    }

    #[tokio::test]
    async fn test_late_reply_lands_in_its_own_placeholder() {
        let (flow, transport) = flow();
        transport.push_chat(
            Scripted::ok(wire(r#"{"response":"slow"}"#)).after(Duration::from_millis(50)),
        );
        transport.push_chat(Scripted::ok(wire(r#"{"response":"fast"}"#)));

        let (first, second) =
            futures_util::join!(flow.send_message("first"), flow.send_message("second"));

        assert_eq!(placeholder_html(&flow, &first), "slow");
        assert_eq!(placeholder_html(&flow, &second), "fast");
    }

    #[tokio::test]
    async fn test_reply_survives_transcript_cleared_in_flight() {
        let (flow, transport) = flow();
        transport.push_chat(
            Scripted::ok(wire(r#"{"response":"**late** reply"}"#))
                .after(Duration::from_millis(50)),
        );

        let chat_box = RegionId::chat_box();
        let (outcome, cleared) = futures_util::join!(flow.send_message("hello"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            flow.surface().replace(&chat_box, Vec::new())
        });
        assert!(cleared);
        assert!(matches!(outcome, ChatOutcome::Answered { .. }));

        assert_eq!(
            placeholder_html(&flow, &outcome),
            "<strong>late</strong> reply"
        );
        let transcript = flow.surface().region(&chat_box).unwrap();
        assert_eq!(transcript.len(), 1);
        assert!(matches!(
            &transcript[0],
            ViewNode::Message { role: MessageRole::Assistant, id: Some(_), .. }
        ));
    }

    #[tokio::test]
    async fn test_error_survives_transcript_cleared_in_flight() {
        let (flow, transport) = flow();
        transport.push_chat(
            Scripted::err(ClientError::Transport("reset".to_string()))
                .after(Duration::from_millis(50)),
        );

        let (outcome, _) = futures_util::join!(flow.send_message("hello"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            flow.surface().replace(&RegionId::chat_box(), Vec::new())
        });
        assert!(matches!(outcome, ChatOutcome::Failed { .. }));
        assert_eq!(placeholder_html(&flow, &outcome), render::CHAT_ERROR);
    }

    #[tokio::test]
    async fn test_view_scrolls_after_every_mutation() {
        let (flow, transport) = flow();
        transport.push_chat(Scripted::ok(wire(r#"{"response":"ok"}"#)));

        flow.send_message("hi").await;
        // user entry, placeholder, reply
        assert_eq!(flow.surface().scroll_count(&RegionId::chat_box()), 3);
    }
}
