//! Order-preserving XML element tree.
//!
//! The tree keeps text, attribute values and comments in their raw (escaped)
//! form as read, so a document can be loaded, modified and written back
//! without touching content the caller did not change. Only the whitespace of
//! element-only content is rewritten by [`Document::indent`].

use super::escape::{escape_xml, quote_safe, unescape_xml};
use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::Write;
use std::path::Path;

/// XML declaration written at the top of every serialized document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

// Elements whose content is segment text; never re-indented.
static INLINE_CONTENT: phf::Set<&'static str> = phf::phf_set! {
    "source", "target", "seg-source", "note", "prop", "mrk", "g", "x",
    "bx", "ex", "ph", "bpt", "ept", "it", "sub",
};

/// A node in the element tree. Text-like variants hold raw markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
}

/// An XML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    /// (qualified name, raw escaped value) in document order
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let raw = std::str::from_utf8(&attr.value)?;
            attributes.push((key, quote_safe(raw).into_owned()));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Qualified element name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unescaped value of an attribute.
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, raw)| unescape_xml(raw))
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        let escaped = escape_xml(value);
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, raw)) => *raw = escaped,
            None => self.attributes.push((key.to_string(), escaped)),
        }
    }

    /// Attribute names in document order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(k, _)| k.as_str())
    }

    pub(crate) fn raw_attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub(crate) fn push_raw_attribute(&mut self, key: String, raw: String) {
        self.attributes.push((key, raw));
    }

    /// Builder-style [`Element::set_attribute`].
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder-style text content.
    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(escape_xml(text)));
        self
    }

    /// All child nodes.
    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements with the given name, in order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    /// All child elements, in order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// First child element with the given name, mutably.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(e) if e.name == name => Some(e),
            _ => None,
        })
    }

    /// Append a child element.
    pub fn add_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Remove and return all child elements with the given name.
    pub fn take_children_named(&mut self, name: &str) -> Vec<Element> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.children.len());
        for node in std::mem::take(&mut self.children) {
            match node {
                Node::Element(e) if e.name == name => taken.push(e),
                other => kept.push(other),
            }
        }
        self.children = kept;
        taken
    }

    /// Concatenated, unescaped text of the direct children.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        for node in &self.children {
            match node {
                Node::Text(t) => raw.push_str(&unescape_xml(t)),
                Node::CData(t) => raw.push_str(t),
                _ => {},
            }
        }
        raw
    }

    fn push_raw_text(&mut self, raw: &str) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(raw);
        } else {
            self.children.push(Node::Text(raw.to_string()));
        }
    }

    fn has_text(&self) -> bool {
        self.children.iter().any(|node| match node {
            Node::Text(t) => !t.trim().is_empty(),
            Node::CData(_) => true,
            _ => false,
        })
    }

    fn preserves_space(&self) -> bool {
        self.attributes
            .iter()
            .any(|(k, v)| k == "xml:space" && v == "preserve")
    }

    fn indent(&mut self, level: usize, spaces: usize) {
        if self.children.is_empty()
            || INLINE_CONTENT.contains(self.name.as_str())
            || self.preserves_space()
            || self.has_text()
        {
            return;
        }

        let inner = format!("\n{}", " ".repeat((level + 1) * spaces));
        let mut indented = Vec::with_capacity(self.children.len() * 2 + 1);
        for node in std::mem::take(&mut self.children) {
            let node = match node {
                // whitespace only, checked by has_text
                Node::Text(_) => continue,
                Node::Element(mut e) => {
                    e.indent(level + 1, spaces);
                    Node::Element(e)
                },
                other => other,
            };
            indented.push(Node::Text(inner.clone()));
            indented.push(node);
        }
        indented.push(Node::Text(format!("\n{}", " ".repeat(level * spaces))));
        self.children = indented;
    }

    fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "<{}", self.name)?;
        for (key, raw) in &self.attributes {
            write!(out, " {}=\"{}\"", key, raw)?;
        }
        if self.children.is_empty() {
            return out.write_all(b"/>");
        }
        out.write_all(b">")?;
        for node in &self.children {
            match node {
                Node::Element(e) => e.write_to(out)?,
                Node::Text(raw) => out.write_all(raw.as_bytes())?,
                Node::CData(raw) => write!(out, "<![CDATA[{}]]>", raw)?,
                Node::Comment(raw) => write!(out, "<!--{}-->", raw)?,
                Node::ProcessingInstruction(raw) => write!(out, "<?{}?>", raw)?,
            }
        }
        write!(out, "</{}>", self.name)
    }
}

/// A parsed XML document: optional DOCTYPE, prolog comments and PIs, and the
/// root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    doctype: Option<String>,
    prolog: Vec<Node>,
    root: Element,
}

impl Document {
    /// Create a document around a root element.
    pub fn new(root: Element) -> Self {
        Self {
            doctype: None,
            prolog: Vec::new(),
            root,
        }
    }

    /// Parse a document from bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();

        let mut doctype = None;
        let mut prolog = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => stack.push(Element::from_start(e)?),
                Event::Empty(ref e) => {
                    let element = Element::from_start(e)?;
                    Self::attach(&mut stack, &mut root, element)?;
                },
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("Unexpected closing tag".to_string()))?;
                    Self::attach(&mut stack, &mut root, element)?;
                },
                Event::Text(ref e) => {
                    let raw = std::str::from_utf8(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_raw_text(raw),
                        None if raw.trim().is_empty() => {},
                        None => {
                            return Err(Error::Xml("Text outside of the root element".to_string()));
                        },
                    }
                },
                Event::GeneralRef(ref e) => {
                    let name = std::str::from_utf8(e)?;
                    let parent = stack
                        .last_mut()
                        .ok_or_else(|| Error::Xml("Reference outside of the root element".to_string()))?;
                    parent.push_raw_text(&format!("&{};", name));
                },
                Event::CData(ref e) => {
                    let node = Node::CData(std::str::from_utf8(e)?.to_string());
                    Self::attach_node(&mut stack, &mut prolog, &root, node);
                },
                Event::Comment(ref e) => {
                    let node = Node::Comment(std::str::from_utf8(e)?.to_string());
                    Self::attach_node(&mut stack, &mut prolog, &root, node);
                },
                Event::PI(ref e) => {
                    let node = Node::ProcessingInstruction(std::str::from_utf8(e)?.to_string());
                    Self::attach_node(&mut stack, &mut prolog, &root, node);
                },
                Event::DocType(ref e) => {
                    doctype = Some(std::str::from_utf8(e)?.trim().to_string());
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(Error::Xml(format!("Unclosed element <{}>", open.name)));
        }
        let root = root.ok_or_else(|| Error::Xml("Document has no root element".to_string()))?;

        Ok(Self {
            doctype,
            prolog,
            root,
        })
    }

    /// Read and parse a document from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
        match stack.last_mut() {
            Some(parent) => {
                parent.add_child(element);
                Ok(())
            },
            None if root.is_none() => {
                *root = Some(element);
                Ok(())
            },
            None => Err(Error::Xml("Multiple root elements".to_string())),
        }
    }

    fn attach_node(stack: &mut [Element], prolog: &mut Vec<Node>, root: &Option<Element>, node: Node) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            // trailing misc after the root is dropped
            None if root.is_none() => prolog.push(node),
            None => {},
        }
    }

    /// The root element.
    #[inline]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The root element, mutably.
    #[inline]
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Re-indent element-only content with `spaces` spaces per level.
    ///
    /// Elements holding text, `xml:space="preserve"` elements and segment
    /// content elements keep their content untouched. Indenting is idempotent.
    pub fn indent(&mut self, spaces: usize) {
        self.root.indent(0, spaces);
    }

    /// Serialize the document.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.write_all(XML_DECLARATION.as_bytes())?;
        out.write_all(b"\n")?;
        if let Some(doctype) = &self.doctype {
            writeln!(out, "<!DOCTYPE {}>", doctype)?;
        }
        for node in &self.prolog {
            match node {
                Node::Comment(raw) => writeln!(out, "<!--{}-->", raw)?,
                Node::ProcessingInstruction(raw) => writeln!(out, "<?{}?>", raw)?,
                _ => {},
            }
        }
        self.root.write_to(out)?;
        out.write_all(b"\n")
    }

    /// Serialize the document to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut bytes);
        bytes
    }

    /// Serialize the document to a file, replacing it if it exists.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut out = std::io::BufWriter::new(file);
        self.write_to(&mut out)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(doc: &Document) -> String {
        String::from_utf8(doc.to_bytes()).unwrap()
    }

    #[test]
    fn test_parse_keeps_attribute_order_and_entities() {
        let doc = Document::parse(
            br#"<?xml version="1.0"?><xliff version="1.2" xmlns="urn:x"><file original="a &amp; b"><body>x &lt; y</body></file></xliff>"#,
        )
        .unwrap();
        let root = doc.root();
        assert_eq!(root.name(), "xliff");
        assert_eq!(root.attribute_names().collect::<Vec<_>>(), vec!["version", "xmlns"]);

        let file = root.child("file").unwrap();
        assert_eq!(file.attribute("original").as_deref(), Some("a & b"));
        assert_eq!(file.child("body").unwrap().text(), "x < y");
        assert!(render(&doc).contains(r#"<file original="a &amp; b"><body>x &lt; y</body></file>"#));
    }

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut element = Element::new("file")
            .with_attribute("datatype", "xml")
            .with_attribute("original", "x");
        element.set_attribute("datatype", "x-sdlpackage");
        element.set_attribute("tool", "a\"b");
        assert_eq!(
            element.attribute_names().collect::<Vec<_>>(),
            vec!["datatype", "original", "tool"]
        );
        assert_eq!(element.attribute("tool").as_deref(), Some("a\"b"));
    }

    #[test]
    fn test_single_quoted_attribute_with_double_quote() {
        let doc = Document::parse(br#"<a title='say "hi"'/>"#).unwrap();
        assert_eq!(render(&doc), format!("{}\n<a title=\"say &quot;hi&quot;\"/>\n", XML_DECLARATION));
    }

    #[test]
    fn test_indent_leaves_mixed_and_segment_content() {
        let mut doc = Document::parse(
            b"<xliff><file><body><trans-unit id=\"1\"><source><g id=\"1\">Hello</g> <x id=\"2\"/></source></trans-unit><p>Mixed <b>bold</b> text</p></body></file></xliff>",
        )
        .unwrap();
        doc.indent(2);
        let expected = format!(
            "{}\n<xliff>\n  <file>\n    <body>\n      <trans-unit id=\"1\">\n        <source><g id=\"1\">Hello</g> <x id=\"2\"/></source>\n      </trans-unit>\n      <p>Mixed <b>bold</b> text</p>\n    </body>\n  </file>\n</xliff>\n",
            XML_DECLARATION
        );
        assert_eq!(render(&doc), expected);
    }

    #[test]
    fn test_indent_is_idempotent() {
        let mut doc = Document::parse(b"<a>\n\t<b><c/></b>   <d/>\n</a>").unwrap();
        doc.indent(2);
        let once = doc.to_bytes();
        let mut again = Document::parse(&once).unwrap();
        again.indent(2);
        assert_eq!(once, again.to_bytes());
    }

    #[test]
    fn test_preserve_space_is_respected() {
        let mut doc = Document::parse(b"<a><b xml:space=\"preserve\"><c/>  <d/></b></a>").unwrap();
        doc.indent(2);
        assert!(render(&doc).contains("<b xml:space=\"preserve\"><c/>  <d/></b>"));
    }

    #[test]
    fn test_comments_cdata_and_prolog_survive() {
        let doc = Document::parse(b"<!-- head --><a><!--inner--><![CDATA[<raw>]]></a><!-- tail -->").unwrap();
        let out = render(&doc);
        assert!(out.contains("<!-- head -->\n<a>"));
        assert!(out.contains("<a><!--inner--><![CDATA[<raw>]]></a>"));
        assert!(!out.contains("tail"));
        assert_eq!(doc.root().text(), "<raw>");
    }

    #[test]
    fn test_take_children_named() {
        let mut doc = Document::parse(b"<xliff><file id=\"1\"/><other/><file id=\"2\"/></xliff>").unwrap();
        let files = doc.root_mut().take_children_named("file");
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].attribute("id").as_deref(), Some("2"));
        assert_eq!(doc.root().elements().count(), 1);
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        assert!(matches!(Document::parse(b"<a><b></a>"), Err(Error::Xml(_))));
        assert!(matches!(Document::parse(b"<a>"), Err(Error::Xml(_))));
        assert!(matches!(Document::parse(b""), Err(Error::Xml(_))));
        assert!(matches!(Document::parse(b"<a/><b/>"), Err(Error::Xml(_))));
    }
}
