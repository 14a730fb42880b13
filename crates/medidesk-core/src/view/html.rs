//! HTML serialization of the view tree.
//!
//! The markup follows the clinic page's Bootstrap classes so a browser
//! adapter can drop the output straight into the existing layout. Text is
//! escaped; controls carry `data-*` attributes instead of inline handlers.

use medidesk_types::chat::MessageRole;

use super::node::{Action, NoticeLevel, ViewNode};

/// Serialize a sequence of nodes.
pub fn to_html(nodes: &[ViewNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

/// Escape text for use in element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_node(node: &ViewNode, out: &mut String) {
    match node {
        ViewNode::Text { text } => out.push_str(&escape(text)),
        ViewNode::Strong { text } => {
            out.push_str("<strong>");
            out.push_str(&escape(text));
            out.push_str("</strong>");
        }
        ViewNode::LineBreak => out.push_str("<br>"),
        ViewNode::Bullet => out.push_str("• "),
        ViewNode::Heading { text } => {
            out.push_str(r#"<p class="small mb-1"><strong>"#);
            out.push_str(&escape(text));
            out.push_str("</strong></p>");
        }
        ViewNode::Spinner { caption } => {
            out.push_str(r#"<i class="fas fa-spinner fa-spin"></i> "#);
            out.push_str(&escape(caption));
        }
        ViewNode::Notice { level, text } => {
            let (tag, class) = match level {
                NoticeLevel::Warning => ("div", "alert alert-warning w-100"),
                NoticeLevel::Danger => ("div", "alert alert-danger w-100"),
                NoticeLevel::Inline => ("span", "text-danger small"),
            };
            out.push_str(&format!(r#"<{tag} class="{class}">"#));
            out.push_str(&escape(text));
            out.push_str(&format!("</{tag}>"));
        }
        ViewNode::Message { role, id, children } => {
            let class = match role {
                MessageRole::User => "message user-message",
                MessageRole::Assistant => "message ai-message",
            };
            match id {
                Some(id) => out.push_str(&format!(
                    r#"<div class="{class}" id="{}">"#,
                    escape(id.as_str())
                )),
                None => out.push_str(&format!(r#"<div class="{class}">"#)),
            }
            for child in children {
                write_node(child, out);
            }
            out.push_str("</div>");
        }
        ViewNode::Region { id, children } => {
            out.push_str(&format!(r#"<div id="{}">"#, escape(id.as_str())));
            for child in children {
                write_node(child, out);
            }
            out.push_str("</div>");
        }
        ViewNode::Card {
            title,
            subtitle,
            details,
            children,
        } => {
            out.push_str(r#"<div class="col-md-6"><div class="card h-100 border-primary shadow-sm"><div class="card-body">"#);
            out.push_str(&format!(
                r#"<h5 class="card-title text-primary">{}</h5>"#,
                escape(title)
            ));
            out.push_str(&format!(
                r#"<h6 class="card-subtitle mb-2 text-muted">{}</h6>"#,
                escape(subtitle)
            ));
            out.push_str(r#"<p class="card-text small">"#);
            for (i, detail) in details.iter().enumerate() {
                if i > 0 {
                    out.push_str("<br>");
                }
                out.push_str(&format!(
                    "<strong>{}:</strong> {}",
                    escape(&detail.label),
                    escape(&detail.value)
                ));
            }
            out.push_str("</p>");
            for child in children {
                write_node(child, out);
            }
            out.push_str("</div></div></div>");
        }
        ViewNode::Button {
            label,
            action,
            enabled,
        } => {
            let attrs = match action {
                Action::LoadSlots {
                    doctor_id,
                    doctor_name,
                } => format!(
                    r#"class="btn btn-sm btn-primary w-100" data-action="load-slots" data-doctor-id="{doctor_id}" data-doctor-name="{}""#,
                    escape(doctor_name)
                ),
                Action::ConfirmBooking(booking) => format!(
                    r#"class="btn btn-outline-success btn-xs" data-action="confirm-booking" data-doctor-name="{}" data-slot="{}""#,
                    escape(&booking.doctor_name),
                    escape(&booking.slot_time)
                ),
            };
            let disabled = if *enabled { "" } else { " disabled" };
            out.push_str(&format!("<button {attrs}{disabled}>"));
            out.push_str(&escape(label));
            out.push_str("</button>");
        }
    }
}
