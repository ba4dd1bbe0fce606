//! Body rendering for display.
//!
//! Turns a response body into something readable on a terminal: JSON bodies
//! become a structured value (pretty-printed on display), HTML is reduced to
//! its visible text, anything else is passed through.

use std::fmt;

use scraper::{Html, Node};

/// Elements whose text is never shown.
const HIDDEN_ELEMENTS: [&str; 6] = ["script", "style", "noscript", "template", "head", "svg"];

/// A rendered response body.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBody {
    /// A machine-readable body that parsed
    Structured(serde_json::Value),
    /// Human-readable text
    Text(String),
}

impl fmt::Display for RenderedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderedBody::Structured(value) => match serde_json::to_string_pretty(value) {
                Ok(pretty) => f.write_str(&pretty),
                Err(_) => write!(f, "{value}"),
            },
            RenderedBody::Text(text) => f.write_str(text),
        }
    }
}

/// Renders `body` according to its `Content-Type`.
///
/// A JSON content type that fails to parse falls back to text rendering.
pub fn render_body(body: &str, content_type: Option<&str>) -> RenderedBody {
    let content_type = content_type.unwrap_or_default().to_ascii_lowercase();

    if content_type.contains("json") {
        match serde_json::from_str(body) {
            Ok(value) => return RenderedBody::Structured(value),
            Err(e) => log::debug!("Body declared as JSON but failed to parse: {e}"),
        }
    }

    if content_type.contains("html") || looks_like_html(body) {
        RenderedBody::Text(html_to_text(body))
    } else {
        RenderedBody::Text(body.to_string())
    }
}

fn looks_like_html(body: &str) -> bool {
    let start = body.trim_start();
    let prefix: String = start.chars().take(15).collect::<String>().to_ascii_lowercase();
    prefix.starts_with("<!doctype html") || prefix.starts_with("<html")
}

/// Visible text of an HTML document, one non-empty text run per line.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines: Vec<String> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines.join("\n")
}
