//! Output sinks - where a simulation streams its display messages.
//!
//! Emissions carry light HTML-style markup (`<b>`, `<h2>`). Sinks decide how
//! to render it.

use std::io::Write;
use std::sync::OnceLock;

use regex::Regex;

/// Display surface for a running simulation.
///
/// `emit` is called synchronously between model calls, so it must return
/// promptly.
pub trait OutputSink {
    fn emit(&mut self, markup: &str);
}

/// Strip markup tags, leaving the text they wrap.
pub fn strip_markup(markup: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    let tags = TAGS.get_or_init(|| Regex::new(r"</?(?:b|h[1-6])>").expect("static regex"));
    tags.replace_all(markup, "").into_owned()
}

/// Writes each emission as plain text to a writer (stdout by default).
pub struct TerminalSink<W: Write = std::io::Stdout> {
    out: W,
}

impl TerminalSink {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for TerminalSink<W> {
    fn emit(&mut self, markup: &str) {
        let text = strip_markup(markup);
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write simulation output: {}", e);
        }
    }
}

/// Keeps every emission in order.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    messages: Vec<String>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl OutputSink for CollectingSink {
    fn emit(&mut self, markup: &str) {
        self.messages.push(markup.to_string());
    }
}
