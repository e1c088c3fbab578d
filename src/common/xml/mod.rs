//! XML utilities shared by the descriptor reader, the header patcher and the
//! merger.

mod escape;
mod tree;

pub use escape::{escape_xml, unescape_xml};
pub use tree::{Document, Element, Node, XML_DECLARATION};
