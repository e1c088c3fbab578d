//! Provenance patching of converted documents.
//!
//! A converter writes a standalone XLIFF document for one package entry. The
//! patch records where the document came from and where its skeleton lives so
//! the merged document can later be turned back into a package.

use crate::common::constants::PACKAGE_DATATYPE;
use crate::common::xml::{Document, Element};
use crate::common::{Error, Result};
use std::path::Path;

/// Indentation used for every document the crate writes.
pub const INDENT: usize = 2;

/// Origin of one converted document.
#[derive(Debug, Clone, Copy)]
pub struct Provenance<'a> {
    /// Input package path
    pub package: &'a Path,
    /// Entry path inside the package
    pub entry: &'a str,
    /// Output archive holding the skeletons
    pub skeleton: &'a Path,
}

fn missing(what: &str) -> Error {
    Error::Xml(format!("Converted document has no {}", what))
}

/// Apply provenance to the first `file` element of a document.
pub fn apply_provenance(doc: &mut Document, provenance: &Provenance<'_>) -> Result<()> {
    let file = doc.root_mut().child_mut("file").ok_or_else(|| missing("<file> element"))?;
    file.set_attribute("datatype", PACKAGE_DATATYPE);
    file.set_attribute("original", &provenance.package.to_string_lossy());

    let header = file.child_mut("header").ok_or_else(|| missing("<header> element"))?;
    let external = header
        .child_mut("skl")
        .and_then(|skl| skl.child_mut("external-file"))
        .ok_or_else(|| missing("skeleton reference"))?;
    external.set_attribute("href", &provenance.skeleton.to_string_lossy());

    let prop = Element::new("prop")
        .with_attribute("prop-type", "original")
        .with_text(provenance.entry);
    let mut group = Element::new("prop-group").with_attribute("name", "document");
    group.add_child(prop);
    header.add_child(group);
    Ok(())
}

/// Patch the converted document at `path` in place.
pub fn patch_header(path: &Path, provenance: &Provenance<'_>) -> Result<()> {
    let mut doc = Document::open(path)?;
    apply_provenance(&mut doc, provenance)?;
    doc.indent(INDENT);
    doc.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONVERTED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
<file original="/tmp/x/doc.sdlxliff" source-language="en-US" target-language="de-DE" datatype="x-unknown">
<header><skl><external-file href="/tmp/x/doc.sdlxliff.skl"/></skl></header>
<body><trans-unit id="1"><source>Fish &amp; <g id="1">chips</g></source></trans-unit></body>
</file>
</xliff>"#;

    fn provenance() -> Provenance<'static> {
        Provenance {
            package: Path::new("/work/Sample.sdlppx"),
            entry: "de-DE/Sample.docx.sdlxliff",
            skeleton: Path::new("/work/Sample.sdlppx.skl"),
        }
    }

    #[test]
    fn test_apply_sets_provenance() {
        let mut doc = Document::parse(CONVERTED.as_bytes()).unwrap();
        apply_provenance(&mut doc, &provenance()).unwrap();

        let file = doc.root().child("file").unwrap();
        assert_eq!(file.attribute("datatype").as_deref(), Some("x-sdlpackage"));
        assert_eq!(file.attribute("original").as_deref(), Some("/work/Sample.sdlppx"));
        // existing attribute order is kept
        assert_eq!(
            file.attribute_names().collect::<Vec<_>>(),
            vec!["original", "source-language", "target-language", "datatype"]
        );

        let header = file.child("header").unwrap();
        let href = header.child("skl").and_then(|s| s.child("external-file")).unwrap();
        assert_eq!(href.attribute("href").as_deref(), Some("/work/Sample.sdlppx.skl"));

        let group = header.child("prop-group").unwrap();
        assert_eq!(group.attribute("name").as_deref(), Some("document"));
        let prop = group.child("prop").unwrap();
        assert_eq!(prop.attribute("prop-type").as_deref(), Some("original"));
        assert_eq!(prop.text(), "de-DE/Sample.docx.sdlxliff");
    }

    #[test]
    fn test_patch_header_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xlf");
        std::fs::write(&path, CONVERTED).unwrap();

        patch_header(&path, &provenance()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#"<source>Fish &amp; <g id="1">chips</g></source>"#));
        assert!(written.contains(
            "      <prop-group name=\"document\">\n        <prop prop-type=\"original\">de-DE/Sample.docx.sdlxliff</prop>\n      </prop-group>"
        ));

        // patching is deterministic
        std::fs::write(&path, CONVERTED).unwrap();
        patch_header(&path, &provenance()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
    }

    #[test]
    fn test_missing_structure_is_an_error() {
        for xml in [
            "<xliff version=\"1.2\"/>",
            "<xliff><file/></xliff>",
            "<xliff><file><header/></file></xliff>",
        ] {
            let mut doc = Document::parse(xml.as_bytes()).unwrap();
            assert!(matches!(apply_provenance(&mut doc, &provenance()), Err(Error::Xml(_))));
        }
    }
}
