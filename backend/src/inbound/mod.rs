//! Inbound adapters that turn external input into domain calls while keeping
//! format details at the edge.
//!
//! Markup text enters through [`markup`], which hosts inline extensions such
//! as the mention resolver and renders their nodes to HTML.

pub mod markup;
