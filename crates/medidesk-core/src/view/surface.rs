//! Surface trait and the in-memory surface.
//!
//! A `Surface` is the only thing that mutates what the user sees. Methods take
//! `&self` because several flows (and several in-flight chat submissions)
//! write to the same surface; implementations use interior mutability and
//! must not block across an `.await` in the caller.

use std::sync::{Mutex, MutexGuard};

use tracing::warn;

use medidesk_types::chat::ChatMessage;

use super::html;
use super::node::ViewNode;
use super::region::RegionId;

/// Adapter that owns the rendered regions.
pub trait Surface: Send + Sync {
    /// Replace the content of `region`. Returns `false` if the region does not
    /// exist.
    fn replace(&self, region: &RegionId, content: Vec<ViewNode>) -> bool;

    /// Append `node` to the end of `region`. Returns `false` if the region
    /// does not exist.
    fn append(&self, region: &RegionId, node: ViewNode) -> bool;

    /// Bring the newest content of `region` into view.
    fn scroll_to_bottom(&self, region: &RegionId);

    /// Show a blocking notice.
    fn alert(&self, message: &str);

    /// Ask a blocking yes/no question.
    fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug)]
struct MemoryState {
    roots: Vec<ViewNode>,
    alerts: Vec<String>,
    confirm_prompts: Vec<String>,
    scrolls: Vec<RegionId>,
    confirm_answer: bool,
}

/// Surface that keeps the region tree in memory.
///
/// Starts with the two root regions, `chat-box` and `triage-results`. Regions
/// nested in mounted nodes (placeholders, slot containers) become addressable
/// as soon as they are mounted. `confirm` answers with a fixed policy.
#[derive(Debug)]
pub struct MemorySurface {
    state: Mutex<MemoryState>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                roots: vec![
                    ViewNode::region(RegionId::chat_box(), Vec::new()),
                    ViewNode::region(RegionId::triage_results(), Vec::new()),
                ],
                alerts: Vec::new(),
                confirm_prompts: Vec::new(),
                scrolls: Vec::new(),
                confirm_answer: true,
            }),
        }
    }

    /// Set what `confirm` answers from now on.
    pub fn with_confirm_answer(self, answer: bool) -> Self {
        self.lock().confirm_answer = answer;
        self
    }

    pub fn set_confirm_answer(&self, answer: bool) {
        self.lock().confirm_answer = answer;
    }

    /// Snapshot of a region's content.
    pub fn region(&self, region: &RegionId) -> Option<Vec<ViewNode>> {
        let state = self.lock();
        let content = state
            .roots
            .iter()
            .find_map(|root| root.find(region))
            .map(|node| node.children().to_vec());
        content
    }

    /// Whether `region` is currently mounted.
    pub fn has_region(&self, region: &RegionId) -> bool {
        self.region(region).is_some()
    }

    /// HTML of a region's content.
    pub fn region_html(&self, region: &RegionId) -> Option<String> {
        self.region(region).map(|nodes| html::to_html(&nodes))
    }

    /// The chat transcript as plain-text turns, oldest first.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.region(&RegionId::chat_box())
            .unwrap_or_default()
            .iter()
            .filter_map(|node| match node {
                ViewNode::Message { role, .. } => Some(ChatMessage {
                    role: *role,
                    text: node.plain_text(),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.lock().alerts.clone()
    }

    pub fn confirm_prompts(&self) -> Vec<String> {
        self.lock().confirm_prompts.clone()
    }

    /// How many times `region` was scrolled to the bottom.
    pub fn scroll_count(&self, region: &RegionId) -> usize {
        self.lock().scrolls.iter().filter(|r| *r == region).count()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panic while holding the lock leaves the tree in a consistent
        // state (every mutation is a single assignment or push).
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn find_children_mut<'a>(
    nodes: &'a mut [ViewNode],
    region: &RegionId,
) -> Option<&'a mut Vec<ViewNode>> {
    for node in nodes.iter_mut() {
        let is_target = node.region_id() == Some(region);
        if let Some(children) = node.children_mut() {
            if is_target {
                return Some(children);
            }
            if let Some(found) = find_children_mut(children, region) {
                return Some(found);
            }
        }
    }
    None
}

impl Surface for MemorySurface {
    fn replace(&self, region: &RegionId, content: Vec<ViewNode>) -> bool {
        let mut state = self.lock();
        match find_children_mut(&mut state.roots, region) {
            Some(children) => {
                *children = content;
                true
            }
            None => {
                warn!(region = %region, "replace on unknown region");
                false
            }
        }
    }

    fn append(&self, region: &RegionId, node: ViewNode) -> bool {
        let mut state = self.lock();
        match find_children_mut(&mut state.roots, region) {
            Some(children) => {
                children.push(node);
                true
            }
            None => {
                warn!(region = %region, "append on unknown region");
                false
            }
        }
    }

    fn scroll_to_bottom(&self, region: &RegionId) {
        self.lock().scrolls.push(region.clone());
    }

    fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        let mut state = self.lock();
        state.confirm_prompts.push(message.to_string());
        state.confirm_answer
    }
}
