//! Inline markup nodes and the extension contract offered by the host parser.
//!
//! Extensions are registered against a trigger character. The host calls
//! [`InlineExtension::parse_inline`] whenever that character appears in plain
//! text (never inside code spans) and splices the returned node into its
//! output.

/// Inline node produced by the host parser or by one of its extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    /// Literal text.
    Text(String),
    /// Verbatim code span content.
    Code(String),
    /// Hyperlink with child content.
    Link(LinkNode),
}

/// Link node: destination, title and child content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkNode {
    /// Target URI.
    pub destination: String,
    /// Title shown on hover.
    pub title: String,
    /// Visible content.
    pub children: Vec<InlineNode>,
}

impl LinkNode {
    /// Concatenate the literal text of all children.
    pub fn label(&self) -> String {
        self.children
            .iter()
            .map(|child| match child {
                InlineNode::Text(text) | InlineNode::Code(text) => text.clone(),
                InlineNode::Link(link) => link.label(),
            })
            .collect()
    }
}

/// Successful extension match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch {
    /// Bytes of input consumed, starting at the trigger character.
    pub consumed: usize,
    /// Node replacing the consumed input.
    pub node: InlineNode,
}

/// Callback contract for inline syntax extensions.
pub trait InlineExtension: Send + Sync {
    /// Character that makes the host invoke this extension.
    fn trigger(&self) -> char;

    /// Try to recognise a construct at `offset`, which points at the trigger.
    ///
    /// Returning `None` means "not a match": the host keeps the trigger and
    /// everything after it as ordinary text.
    fn parse_inline(&self, text: &str, offset: usize) -> Option<InlineMatch>;
}
