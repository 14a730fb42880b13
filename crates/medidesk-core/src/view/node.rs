//! The view tree.

use serde::Serialize;

use medidesk_types::chat::MessageRole;
use medidesk_types::triage::BookingRequest;

use super::region::RegionId;

/// Severity of a notice block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Full-width warning, e.g. "no specialist found".
    Warning,
    /// Full-width error, e.g. a connection failure.
    Danger,
    /// Small inline error inside a card.
    Inline,
}

/// What a control does when activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    LoadSlots { doctor_id: i64, doctor_name: String },
    ConfirmBooking(BookingRequest),
}

/// A labelled value inside a specialist card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detail {
    pub label: String,
    pub value: String,
}

impl Detail {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A node in the rendered view.
///
/// `Message` nodes with an `id` and `Region` nodes are addressable: a
/// [`Surface`](super::Surface) can replace or append to their children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewNode {
    Text {
        text: String,
    },
    Strong {
        text: String,
    },
    LineBreak,
    Bullet,
    Heading {
        text: String,
    },
    Spinner {
        caption: String,
    },
    Notice {
        level: NoticeLevel,
        text: String,
    },
    Message {
        role: MessageRole,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<RegionId>,
        children: Vec<ViewNode>,
    },
    Region {
        id: RegionId,
        children: Vec<ViewNode>,
    },
    Card {
        title: String,
        subtitle: String,
        details: Vec<Detail>,
        children: Vec<ViewNode>,
    },
    Button {
        label: String,
        action: Action,
        enabled: bool,
    },
}

impl ViewNode {
    pub fn text(text: impl Into<String>) -> Self {
        ViewNode::Text { text: text.into() }
    }

    pub fn strong(text: impl Into<String>) -> Self {
        ViewNode::Strong { text: text.into() }
    }

    pub fn region(id: RegionId, children: Vec<ViewNode>) -> Self {
        ViewNode::Region { id, children }
    }

    /// The region this node exposes, if any.
    pub fn region_id(&self) -> Option<&RegionId> {
        match self {
            ViewNode::Region { id, .. } => Some(id),
            ViewNode::Message { id, .. } => id.as_ref(),
            _ => None,
        }
    }

    pub fn children(&self) -> &[ViewNode] {
        match self {
            ViewNode::Message { children, .. }
            | ViewNode::Region { children, .. }
            | ViewNode::Card { children, .. } => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<ViewNode>> {
        match self {
            ViewNode::Message { children, .. }
            | ViewNode::Region { children, .. }
            | ViewNode::Card { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Depth-first search for the subtree of `id`.
    pub fn find(&self, id: &RegionId) -> Option<&ViewNode> {
        if self.region_id() == Some(id) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// All buttons under this node, in document order.
    pub fn buttons(&self) -> Vec<&ViewNode> {
        let mut out = Vec::new();
        collect_buttons(self, &mut out);
        out
    }

    /// Text content with markup dropped; line breaks become `\n`.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        write_plain(self, &mut out);
        out
    }
}

fn collect_buttons<'a>(node: &'a ViewNode, out: &mut Vec<&'a ViewNode>) {
    if matches!(node, ViewNode::Button { .. }) {
        out.push(node);
    }
    for child in node.children() {
        collect_buttons(child, out);
    }
}

fn write_plain(node: &ViewNode, out: &mut String) {
    match node {
        ViewNode::Text { text }
        | ViewNode::Strong { text }
        | ViewNode::Heading { text }
        | ViewNode::Notice { text, .. } => out.push_str(text),
        ViewNode::Spinner { caption } => out.push_str(caption),
        ViewNode::LineBreak => out.push('\n'),
        ViewNode::Bullet => out.push_str("• "),
        ViewNode::Button { label, .. } => out.push_str(label),
        ViewNode::Card {
            title,
            subtitle,
            details,
            children,
        } => {
            out.push_str(title);
            out.push('\n');
            out.push_str(subtitle);
            for detail in details {
                out.push('\n');
                out.push_str(&format!("{}: {}", detail.label, detail.value));
            }
            for child in children {
                out.push('\n');
                write_plain(child, out);
            }
        }
        ViewNode::Message { children, .. } | ViewNode::Region { children, .. } => {
            for child in children {
                write_plain(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card() -> ViewNode {
        ViewNode::Card {
            title: "Dr. Sana".to_string(),
            subtitle: "Dermatologist".to_string(),
            details: vec![Detail::new("Room", "12")],
            children: vec![
                ViewNode::Button {
                    label: "Select Doctor & View Slots".to_string(),
                    action: Action::LoadSlots {
                        doctor_id: 4,
                        doctor_name: "Dr. Sana".to_string(),
                    },
                    enabled: true,
                },
                ViewNode::region(RegionId::slots_container(4), vec![]),
            ],
        }
    }

    #[test]
    fn test_find_nested_region() {
        let card = sample_card();
        let found = card.find(&RegionId::slots_container(4)).unwrap();
        assert!(found.children().is_empty());
        assert!(card.find(&RegionId::slots_container(5)).is_none());
    }

    #[test]
    fn test_buttons_in_document_order() {
        let card = sample_card();
        let buttons = card.buttons();
        assert_eq!(buttons.len(), 1);
        assert!(matches!(
            buttons[0],
            ViewNode::Button {
                action: Action::LoadSlots { doctor_id: 4, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_plain_text_of_card() {
        let text = sample_card().plain_text();
        assert!(text.starts_with("Dr. Sana\nDermatologist\nRoom: 12"));
    }

    #[test]
    fn test_serialize_tags_kind() {
        let json = serde_json::to_value(ViewNode::LineBreak).unwrap();
        assert_eq!(json["kind"], "line_break");

        let json = serde_json::to_value(ViewNode::Button {
            label: "10:00".to_string(),
            action: Action::ConfirmBooking(BookingRequest::new("Dr. A", "10:00")),
            enabled: true,
        })
        .unwrap();
        assert_eq!(json["action"]["type"], "confirm_booking");
        assert_eq!(json["action"]["doctor_name"], "Dr. A");
    }
}
