//! Terminal implementation of the `Surface` port.
//!
//! Every mutation is applied to an in-memory region tree first (so commands
//! can read back what was rendered, e.g. the controls of a specialist card)
//! and then echoed to the terminal. Loading indicators become indicatif
//! spinners keyed by region; they stop when the region is replaced.

use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline_async::SharedWriter;

use medidesk_core::view::{MemorySurface, NoticeLevel, RegionId, Surface, ViewNode};
use medidesk_types::chat::MessageRole;

/// How much the surface writes to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Spinners, colors, tables.
    Styled,
    /// Content only: no spinners, pending states print one line.
    Plain,
    /// Nothing; the command prints JSON at the end.
    Silent,
}

impl OutputMode {
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if json {
            Self::Silent
        } else if quiet {
            Self::Plain
        } else {
            Self::Styled
        }
    }
}

pub struct TerminalSurface {
    store: MemorySurface,
    mode: OutputMode,
    interactive: bool,
    echo_user: AtomicBool,
    pending: Mutex<HashMap<RegionId, ProgressBar>>,
    writer: Mutex<Option<SharedWriter>>,
}

impl TerminalSurface {
    pub fn new(mode: OutputMode) -> Self {
        Self::build(mode, console::Term::stderr().is_term())
    }

    fn build(mode: OutputMode, interactive: bool) -> Self {
        Self {
            store: MemorySurface::new(),
            mode,
            interactive,
            echo_user: AtomicBool::new(true),
            pending: Mutex::new(HashMap::new()),
            writer: Mutex::new(None),
        }
    }

    /// The region tree as rendered so far.
    pub fn store(&self) -> &MemorySurface {
        &self.store
    }

    /// Whether user turns are printed when appended. The chat loop turns
    /// this off because readline already shows what was typed.
    pub fn set_echo_user(&self, echo: bool) {
        self.echo_user.store(echo, Ordering::Relaxed);
    }

    /// Route output through a readline writer so it does not tear the
    /// prompt. Spinners are replaced by single pending lines while attached.
    pub fn attach_writer(&self, writer: SharedWriter) {
        *lock(&self.writer) = Some(writer);
    }

    pub fn detach_writer(&self) {
        *lock(&self.writer) = None;
    }

    /// Print a line that is not part of any region (help, hints), through
    /// the readline writer when one is attached.
    pub fn say(&self, text: &str) {
        self.emit(text);
    }

    /// Drop the chat transcript kept in memory. Entries still waiting for a
    /// reply stay mounted so the reply has somewhere to land.
    pub fn clear_transcript(&self) {
        let chat_box = RegionId::chat_box();
        let pending: Vec<ViewNode> = self
            .store
            .region(&chat_box)
            .unwrap_or_default()
            .into_iter()
            .filter(is_unresolved_entry)
            .collect();
        self.store.replace(&chat_box, pending);
    }

    fn emit(&self, text: &str) {
        if self.mode == OutputMode::Silent {
            return;
        }
        let mut writer = lock(&self.writer);
        match writer.as_mut() {
            Some(writer) => {
                let _ = writeln!(writer, "{text}");
            }
            None => println!("{text}"),
        }
    }

    fn start_pending(&self, region: &RegionId, caption: &str) {
        let use_spinner = self.mode == OutputMode::Styled && lock(&self.writer).is_none();
        if !use_spinner {
            self.emit(&format!("  {}", style(pending_line(region, caption)).dim()));
            return;
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
            bar.set_style(spinner_style);
        }
        bar.set_message(caption.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        if let Some(previous) = lock(&self.pending).insert(region.clone(), bar) {
            previous.finish_and_clear();
        }
    }

    fn finish_pending(&self, region: &RegionId) {
        if let Some(bar) = lock(&self.pending).remove(region) {
            bar.finish_and_clear();
        }
    }

    fn show(&self, region: &RegionId, content: &[ViewNode]) {
        if let [ViewNode::Spinner { caption }] = content {
            self.start_pending(region, caption);
            return;
        }
        self.finish_pending(region);

        if content.is_empty() {
            return;
        }
        if region.is_placeholder() {
            self.emit(&reply_line(region, content));
        } else {
            for line in block_lines(content) {
                self.emit(&line);
            }
        }
    }
}

impl Surface for TerminalSurface {
    fn replace(&self, region: &RegionId, content: Vec<ViewNode>) -> bool {
        let mounted = self.store.replace(region, content.clone());
        if mounted {
            self.show(region, &content);
        }
        mounted
    }

    fn append(&self, region: &RegionId, node: ViewNode) -> bool {
        if !self.store.append(region, node.clone()) {
            return false;
        }

        match &node {
            ViewNode::Message {
                role: MessageRole::User,
                children,
                ..
            } => {
                if self.echo_user.load(Ordering::Relaxed) {
                    self.emit(&format!(
                        "\n  {} {}",
                        style("You >").green().bold(),
                        inline_text(children)
                    ));
                }
            }
            ViewNode::Message {
                role: MessageRole::Assistant,
                id: Some(id),
                children,
            } => self.show(id, children),
            other => {
                for line in block_lines(std::slice::from_ref(other)) {
                    self.emit(&line);
                }
            }
        }
        true
    }

    fn scroll_to_bottom(&self, region: &RegionId) {
        // A terminal is always scrolled to its newest line.
        self.store.scroll_to_bottom(region);
    }

    fn alert(&self, message: &str) {
        self.store.alert(message);

        let mut lines = message.lines();
        if let Some(first) = lines.next() {
            self.emit(&format!("\n  {}", style(first).bold()));
        }
        for line in lines {
            self.emit(&format!("  {line}"));
        }
        self.emit("");
    }

    fn confirm(&self, message: &str) -> bool {
        self.store.confirm(message);

        if !self.interactive {
            self.emit(&format!(
                "  {} {message} (no terminal, not confirmed)",
                style("?").yellow().bold()
            ));
            return false;
        }
        Confirm::new()
            .with_prompt(message)
            .default(true)
            .interact()
            .unwrap_or(false)
    }
}

/// An assistant entry still showing its loading indicator.
fn is_unresolved_entry(node: &ViewNode) -> bool {
    matches!(
        node,
        ViewNode::Message { id: Some(_), children, .. }
            if matches!(children.as_slice(), [ViewNode::Spinner { .. }])
    )
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Short id of a chat placeholder, e.g. `3` for `ai-msg-3`.
fn placeholder_number(region: &RegionId) -> &str {
    region.as_str().trim_start_matches("ai-msg-")
}

fn pending_line(region: &RegionId, caption: &str) -> String {
    if region.is_placeholder() {
        format!("[#{}] {caption}", placeholder_number(region))
    } else {
        caption.to_string()
    }
}

/// One chat reply, labelled with its submission number so replies that
/// finish out of order can still be matched to their question.
fn reply_line(region: &RegionId, content: &[ViewNode]) -> String {
    format!(
        "\n  {} {}\n",
        style(format!("MediDesk #{} >", placeholder_number(region)))
            .cyan()
            .bold(),
        inline_text(content)
    )
}

/// Inline nodes as styled terminal text. Continuation lines are indented to
/// sit under the reply.
fn inline_text(nodes: &[ViewNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            ViewNode::Text { text } => out.push_str(text),
            ViewNode::Strong { text } => out.push_str(&style(text).bold().to_string()),
            ViewNode::LineBreak => out.push_str("\n    "),
            ViewNode::Bullet => out.push_str(&style("• ").cyan().to_string()),
            ViewNode::Notice { level, text } => out.push_str(&notice(*level, text)),
            other => out.push_str(&other.plain_text()),
        }
    }
    out
}

fn notice(level: NoticeLevel, text: &str) -> String {
    match level {
        NoticeLevel::Warning => format!("{} {}", style("!").yellow().bold(), style(text).yellow()),
        NoticeLevel::Danger => format!("{} {}", style("✗").red().bold(), style(text).red()),
        NoticeLevel::Inline => style(text).red().dim().to_string(),
    }
}

/// Block content (cards, notices, slot pickers) as printable lines.
///
/// Consecutive cards are gathered into one table; slot controls are
/// numbered in the order they were rendered.
fn block_lines(nodes: &[ViewNode]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cards: Vec<&ViewNode> = Vec::new();
    let mut control = 0;

    for node in nodes {
        if matches!(node, ViewNode::Card { .. }) {
            cards.push(node);
            continue;
        }
        if !cards.is_empty() {
            lines.push(cards_table(&cards).to_string());
            cards.clear();
        }

        match node {
            ViewNode::Notice { level, text } => lines.push(format!("  {}", notice(*level, text))),
            ViewNode::Heading { text } => lines.push(format!("  {}", style(text).bold())),
            ViewNode::Spinner { caption } => lines.push(format!("  {}", style(caption).dim())),
            ViewNode::Button { label, enabled, .. } => {
                control += 1;
                if *enabled {
                    lines.push(format!("  {} {label}", style(format!("[{control}]")).cyan()));
                } else {
                    lines.push(format!(
                        "  {}",
                        style(format!("[{control}] {label} (booked)")).dim()
                    ));
                }
            }
            ViewNode::Region { children, .. } => lines.extend(block_lines(children)),
            ViewNode::Message { children, .. } => {
                lines.push(format!("  {}", inline_text(children)));
            }
            inline => lines.push(format!("  {}", inline_text(std::slice::from_ref(inline)))),
        }
    }

    if !cards.is_empty() {
        lines.push(cards_table(&cards).to_string());
    }
    lines
}

/// Specialist cards as one table: name, specialization, then one column per
/// detail (shift, room, fee).
fn cards_table(cards: &[&ViewNode]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Doctor").fg(Color::White),
        Cell::new("Specialization").fg(Color::White),
    ];
    if let Some(ViewNode::Card { details, .. }) = cards.first() {
        header.extend(details.iter().map(|d| Cell::new(&d.label).fg(Color::White)));
    }
    table.set_header(header);

    for (i, card) in cards.iter().enumerate() {
        if let ViewNode::Card {
            title,
            subtitle,
            details,
            ..
        } = card
        {
            let mut row = vec![
                Cell::new(i + 1).fg(Color::DarkGrey),
                Cell::new(title).fg(Color::Cyan),
                Cell::new(subtitle),
            ];
            row.extend(details.iter().map(|d| Cell::new(&d.value)));
            table.add_row(row);
        }
    }
    table
}
