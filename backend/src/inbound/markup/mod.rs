//! Minimal inline markup host.
//!
//! The parser splits text into plain runs, backtick code spans and nodes
//! produced by registered [`InlineExtension`]s. Triggers inside code spans are
//! never offered to extensions.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::markup::{InlineExtension, InlineNode};

mod render;

pub use render::render_html;

const CODE_FENCE: char = '`';

/// Inline parser dispatching trigger characters to extensions.
///
/// # Examples
///
/// ```rust,ignore
/// let mut parser = InlineParser::new();
/// parser.register(Arc::new(resolver));
/// let html = render_html(&parser.parse("Write to @alex@example.org."));
/// ```
#[derive(Default)]
pub struct InlineParser {
    extensions: HashMap<char, Arc<dyn InlineExtension>>,
}

impl InlineParser {
    /// Create a parser with no extensions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `extension` under its trigger, returning any extension it
    /// replaces.
    pub fn register(
        &mut self,
        extension: Arc<dyn InlineExtension>,
    ) -> Option<Arc<dyn InlineExtension>> {
        self.extensions.insert(extension.trigger(), extension)
    }

    /// Parse `text` into inline nodes.
    pub fn parse(&self, text: &str) -> Vec<InlineNode> {
        let mut nodes = Vec::new();
        let mut plain_start = 0;
        let mut cursor = 0;

        while let Some(ch) = text.get(cursor..).and_then(|rest| rest.chars().next()) {
            if ch == CODE_FENCE {
                if let Some((code, end)) = code_span(text, cursor) {
                    push_text(&mut nodes, text, plain_start, cursor);
                    nodes.push(InlineNode::Code(code.to_owned()));
                    cursor = end;
                    plain_start = end;
                    continue;
                }
            } else if let Some(extension) = self.extensions.get(&ch) {
                let matched = extension
                    .parse_inline(text, cursor)
                    .filter(|found| found.consumed > 0)
                    .filter(|found| text.is_char_boundary(cursor + found.consumed));
                if let Some(found) = matched {
                    push_text(&mut nodes, text, plain_start, cursor);
                    nodes.push(found.node);
                    cursor += found.consumed;
                    plain_start = cursor;
                    continue;
                }
            }
            cursor += ch.len_utf8();
        }

        push_text(&mut nodes, text, plain_start, text.len());
        nodes
    }
}

fn push_text(nodes: &mut Vec<InlineNode>, text: &str, start: usize, end: usize) {
    if let Some(run) = text.get(start..end).filter(|run| !run.is_empty()) {
        nodes.push(InlineNode::Text(run.to_owned()));
    }
}

/// Find the code span opening at `start`: a run of backticks closed by a run
/// of the same length. Returns the content and the end offset.
fn code_span(text: &str, start: usize) -> Option<(&str, usize)> {
    let rest = text.get(start..)?;
    let fence_len = rest.len() - rest.trim_start_matches(CODE_FENCE).len();
    let fence = rest.get(..fence_len)?;
    let body = rest.get(fence_len..)?;

    let mut search_from = 0;
    while let Some(found) = body.get(search_from..)?.find(fence) {
        let close = search_from + found;
        let after = body.get(close + fence_len..)?;
        if after.starts_with(CODE_FENCE) {
            let longer = after.len() - after.trim_start_matches(CODE_FENCE).len();
            search_from = close + fence_len + longer;
            continue;
        }
        let content = body.get(..close)?;
        return Some((content, start + fence_len + close + fence_len));
    }
    None
}
