//! Light markup for assistant replies.
//!
//! The server answers in loose markdown. Only four constructs are honoured,
//! applied once to the raw text in this order:
//!
//! 1. `\n\n` → paragraph break (two line breaks),
//! 2. `\n` → line break,
//! 3. `**text**` → strong span (shortest match, never across a line break),
//! 4. a line starting with `* ` → bullet marker.
//!
//! Output is a node sequence, never re-scanned, so substituted markup cannot
//! be matched a second time.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::view::ViewNode;
use crate::view::html;

/// Shown when the server sent no text at all.
pub const NO_RESPONSE: &str = "No response generated.";

static STRONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("strong pattern is valid"));

/// A formatted assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedText {
    nodes: Vec<ViewNode>,
}

impl FormattedText {
    pub fn nodes(&self) -> &[ViewNode] {
        &self.nodes
    }

    pub fn to_html(&self) -> String {
        html::to_html(&self.nodes)
    }

    /// Whether this is the "no response" placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.nodes.as_slice(), [ViewNode::Text { text }] if text == NO_RESPONSE)
    }
}

impl fmt::Display for FormattedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            f.write_str(&node.plain_text())?;
        }
        Ok(())
    }
}

/// Format reply text for display. `None` or `""` yields [`NO_RESPONSE`].
pub fn format_medical_output(text: Option<&str>) -> FormattedText {
    let text = match text {
        Some(text) if !text.is_empty() => text,
        _ => {
            return FormattedText {
                nodes: vec![ViewNode::text(NO_RESPONSE)],
            };
        }
    };

    let mut nodes = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            nodes.push(ViewNode::LineBreak);
        }
        push_line(line, &mut nodes);
    }
    FormattedText { nodes }
}

fn push_line(line: &str, nodes: &mut Vec<ViewNode>) {
    let rest = match line.strip_prefix("* ") {
        Some(rest) => {
            nodes.push(ViewNode::Bullet);
            rest
        }
        None => line,
    };

    let mut cursor = 0;
    for caps in STRONG.captures_iter(rest) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            nodes.push(ViewNode::text(&rest[cursor..whole.start()]));
        }
        nodes.push(ViewNode::strong(inner.as_str()));
        cursor = whole.end();
    }
    if cursor < rest.len() {
        nodes.push(ViewNode::text(&rest[cursor..]));
    }
}
