//! Format expansion
//!
//! Supports `#{name}` variables, the single-letter aliases and `##` for a
//! literal `#`. Unknown variables expand to nothing.

use std::collections::BTreeMap;

/// Template used by `split-window -P` when no `-F` is given
pub const SPLIT_WINDOW_TEMPLATE: &str = "#{session_name}:#{window_index}.#{pane_index}";

/// Variables available to a format
#[derive(Clone, Debug, Default)]
pub struct FormatContext {
    values: BTreeMap<String, String>,
}

impl FormatContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, value: impl ToString) {
        self.values.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

fn alias(c: char) -> Option<&'static str> {
    match c {
        'S' => Some("session_name"),
        'I' => Some("window_index"),
        'P' => Some("pane_index"),
        'D' => Some("pane_id"),
        'W' => Some("window_name"),
        'T' => Some("pane_title"),
        _ => None,
    }
}

/// Expand a template against a context
pub fn expand(template: &str, ctx: &FormatContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(at) = rest.find('#') {
        out.push_str(&rest[..at]);
        let after = &rest[at + 1..];
        let mut chars = after.chars();
        match chars.next() {
            Some('#') => {
                out.push('#');
                rest = chars.as_str();
            }
            Some('{') => match after[1..].find('}') {
                Some(end) => {
                    let name = &after[1..1 + end];
                    out.push_str(ctx.get(name).unwrap_or(""));
                    rest = &after[end + 2..];
                }
                None => {
                    // Unterminated, keep as typed
                    out.push_str(&rest[at..]);
                    rest = "";
                }
            },
            Some(c) => match alias(c) {
                Some(name) => {
                    out.push_str(ctx.get(name).unwrap_or(""));
                    rest = chars.as_str();
                }
                None => {
                    out.push('#');
                    rest = after;
                }
            },
            None => {
                out.push('#');
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
