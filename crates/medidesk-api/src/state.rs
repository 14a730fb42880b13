//! Application state wiring the clinic client together.
//!
//! The flows are generic over transport and surface; AppState pins them to
//! the reqwest transport and the terminal surface.

use std::path::PathBuf;
use std::sync::Arc;

use medidesk_core::chat::ChatFlow;
use medidesk_core::triage::TriageFlow;
use medidesk_infra::clinic::HttpClinicTransport;
use medidesk_infra::config::{apply_server_override, load_client_config, resolve_config_dir};
use medidesk_types::config::ClientConfig;
use medidesk_types::triage::NaiveDate;

use crate::cli::terminal::{OutputMode, TerminalSurface};

/// Concrete type aliases for the flow generics pinned to the CLI implementations.
pub type ConcreteChatFlow = ChatFlow<HttpClinicTransport, TerminalSurface>;

pub type ConcreteTriageFlow = TriageFlow<HttpClinicTransport, TerminalSurface>;

/// Shared state for CLI commands.
pub struct AppState {
    pub transport: Arc<HttpClinicTransport>,
    pub surface: Arc<TerminalSurface>,
}

impl AppState {
    /// Load configuration, apply the `--server` override, and build the transport.
    pub async fn init(server: Option<&str>, mode: OutputMode) -> anyhow::Result<Self> {
        let (_, config) = load_effective_config(server).await;
        let transport = HttpClinicTransport::new(&config)?;

        Ok(Self {
            transport: Arc::new(transport),
            surface: Arc::new(TerminalSurface::new(mode)),
        })
    }

    pub fn chat_flow(&self) -> ConcreteChatFlow {
        ChatFlow::new(Arc::clone(&self.transport), Arc::clone(&self.surface))
    }

    /// A triage flow; `slot_date` is forwarded with every slots request.
    pub fn triage_flow(&self, slot_date: Option<NaiveDate>) -> ConcreteTriageFlow {
        TriageFlow::new(Arc::clone(&self.transport), Arc::clone(&self.surface))
            .with_slot_date(slot_date)
    }
}

/// The config directory and the configuration commands will run with.
pub async fn load_effective_config(server: Option<&str>) -> (PathBuf, ClientConfig) {
    let config_dir = resolve_config_dir();
    let config = load_client_config(&config_dir).await;
    (config_dir, apply_server_override(config, server))
}
