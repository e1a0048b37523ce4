//! HTML rendering for inline nodes.

use crate::domain::markup::InlineNode;

/// Render `nodes` as escaped HTML.
///
/// # Examples
/// ```
/// use wiki_backend::domain::{InlineNode, LinkNode};
/// use wiki_backend::inbound::markup::render_html;
///
/// let nodes = vec![
///     InlineNode::Text("Write to ".to_owned()),
///     InlineNode::Link(LinkNode {
///         destination: "https://example.org/users/alex".to_owned(),
///         title: "@alex@example.org".to_owned(),
///         children: vec![InlineNode::Text("@alex".to_owned())],
///     }),
///     InlineNode::Text(".".to_owned()),
/// ];
/// assert_eq!(
///     render_html(&nodes),
///     r#"Write to <a href="https://example.org/users/alex" title="@alex@example.org">@alex</a>."#
/// );
/// ```
pub fn render_html(nodes: &[InlineNode]) -> String {
    let mut html = String::new();
    for node in nodes {
        render_node(&mut html, node);
    }
    html
}

fn render_node(html: &mut String, node: &InlineNode) {
    match node {
        InlineNode::Text(text) => escape_into(html, text),
        InlineNode::Code(code) => {
            html.push_str("<code>");
            escape_into(html, code);
            html.push_str("</code>");
        }
        InlineNode::Link(link) => {
            let mut destination = String::new();
            escape_into(&mut destination, &link.destination);
            let mut title = String::new();
            escape_into(&mut title, &link.title);
            html.push_str(&format!(r#"<a href="{destination}" title="{title}">"#));
            for child in &link.children {
                render_node(html, child);
            }
            html.push_str("</a>");
        }
    }
}

fn escape_into(html: &mut String, raw: &str) {
    for ch in raw.chars() {
        match ch {
            '&' => html.push_str("&amp;"),
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '"' => html.push_str("&quot;"),
            '\'' => html.push_str("&#39;"),
            other => html.push(other),
        }
    }
}
