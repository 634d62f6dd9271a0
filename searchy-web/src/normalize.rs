//! HTML to plain text
//!
//! Text nodes are taken in document order with entities decoded, each line is
//! trimmed, runs of blank lines collapse to one and blank runs at either end
//! are dropped. Running the output through again gives the same text.

use scraper::{Html, Node};

/// Elements whose text is never rendered
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Convert markup to whitespace-normalized text
pub fn normalize_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::with_capacity(html.len() / 2);

    for node in document.tree.root().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => SKIPPED_ELEMENTS.contains(&element.name()),
            _ => false,
        });
        if !hidden {
            text.push_str(fragment);
        }
    }

    collapse_lines(&text)
}

fn is_blank_char(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\u{00A0}' || c == '\u{200B}'
}

/// Trim lines, squeeze blank runs to a single blank line, drop blank edges
fn collapse_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut pending_blank = false;

    for line in text.lines() {
        let line = line.trim_matches(is_blank_char);
        if line.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }
        if pending_blank {
            lines.push("");
            pending_blank = false;
        }
        lines.push(line);
    }

    lines.join(LINE_ENDING)
}
