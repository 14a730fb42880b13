//! Scripted transport for flow tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use medidesk_types::chat::{ChatReply, ChatRequest};
use medidesk_types::error::ClientError;
use medidesk_types::triage::{SlotsReply, SlotsRequest, SpecialistsReply, SpecialistsRequest};

use crate::transport::ClinicTransport;

/// One scripted reply: an optional delay, then the result.
pub struct Scripted<T> {
    pub delay: Option<Duration>,
    pub result: Result<T, ClientError>,
}

impl<T> Scripted<T> {
    pub fn ok(value: T) -> Self {
        Self {
            delay: None,
            result: Ok(value),
        }
    }

    pub fn err(error: ClientError) -> Self {
        Self {
            delay: None,
            result: Err(error),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Parse a JSON fixture the way the HTTP transport would.
pub fn wire<T: serde::de::DeserializeOwned>(json: &str) -> T {
    serde_json::from_str(json).expect("fixture is valid")
}

/// Transport that replays queued replies and records every request.
///
/// Calling an endpoint with an empty queue panics, which doubles as the
/// assertion that no request was expected.
#[derive(Default)]
pub struct ScriptedTransport {
    chat: Mutex<VecDeque<Scripted<ChatReply>>>,
    specialists: Mutex<VecDeque<Scripted<SpecialistsReply>>>,
    slots: Mutex<VecDeque<Scripted<SlotsReply>>>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    pub specialist_requests: Mutex<Vec<Option<SpecialistsRequest>>>,
    pub slot_requests: Mutex<Vec<SlotsRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_chat(&self, reply: Scripted<ChatReply>) {
        self.chat.lock().unwrap().push_back(reply);
    }

    pub fn push_specialists(&self, reply: Scripted<SpecialistsReply>) {
        self.specialists.lock().unwrap().push_back(reply);
    }

    pub fn push_slots(&self, reply: Scripted<SlotsReply>) {
        self.slots.lock().unwrap().push_back(reply);
    }

    pub fn request_count(&self) -> usize {
        self.chat_requests.lock().unwrap().len()
            + self.specialist_requests.lock().unwrap().len()
            + self.slot_requests.lock().unwrap().len()
    }
}

async fn play<T>(queue: &Mutex<VecDeque<Scripted<T>>>, endpoint: &str) -> Result<T, ClientError> {
    let next = queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| panic!("unexpected {endpoint} request"));
    if let Some(delay) = next.delay {
        tokio::time::sleep(delay).await;
    }
    next.result
}

impl ClinicTransport for ScriptedTransport {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        self.chat_requests.lock().unwrap().push(request.clone());
        play(&self.chat, "chat").await
    }

    async fn specialists(
        &self,
        request: &SpecialistsRequest,
    ) -> Result<SpecialistsReply, ClientError> {
        self.specialist_requests
            .lock()
            .unwrap()
            .push(Some(request.clone()));
        play(&self.specialists, "specialists").await
    }

    async fn all_specialists(&self) -> Result<SpecialistsReply, ClientError> {
        self.specialist_requests.lock().unwrap().push(None);
        play(&self.specialists, "all_specialists").await
    }

    async fn slots(&self, request: &SlotsRequest) -> Result<SlotsReply, ClientError> {
        self.slot_requests.lock().unwrap().push(request.clone());
        play(&self.slots, "slots").await
    }
}
