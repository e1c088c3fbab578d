//! Ordered merging of converted documents.

use super::patch::INDENT;
use crate::common::constants::{XLIFF_NAMESPACE, XLIFF_VERSION};
use crate::common::xml::{Document, Element};
use crate::common::{Error, Result};
use std::path::Path;
use tempfile::TempPath;

/// Combines per-entry documents into one composite document.
pub trait DocumentMerger {
    /// Merge `inputs`, in order, into `output`.
    fn merge(&self, inputs: &[&Path], output: &Path) -> Result<()>;
}

/// Default XLIFF joiner.
///
/// The composite root copies the first input's root element; every `file`
/// element of every input is appended in input order, untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct XliffJoiner;

impl XliffJoiner {
    pub fn new() -> Self {
        Self
    }

    fn empty_root() -> Element {
        Element::new("xliff")
            .with_attribute("version", XLIFF_VERSION)
            .with_attribute("xmlns", XLIFF_NAMESPACE)
    }

    fn join(inputs: &[&Path]) -> Result<Document> {
        let mut root: Option<Element> = None;
        for path in inputs {
            let mut doc = Document::open(path)
                .map_err(|e| Error::Merge(format!("Cannot read {}: {}", path.display(), e)))?;
            let files = doc.root_mut().take_children_named("file");
            let composite = root.get_or_insert_with(|| {
                let mut first = Element::new(doc.root().name());
                for (key, raw) in doc.root().raw_attributes() {
                    first.push_raw_attribute(key.clone(), raw.clone());
                }
                first
            });
            for (key, raw) in doc.root().raw_attributes() {
                if key.starts_with("xmlns") && !composite.attribute_names().any(|k| k == key.as_str()) {
                    composite.push_raw_attribute(key.clone(), raw.clone());
                }
            }
            for file in files {
                composite.add_child(file);
            }
        }
        Ok(Document::new(root.unwrap_or_else(Self::empty_root)))
    }
}

impl DocumentMerger for XliffJoiner {
    fn merge(&self, inputs: &[&Path], output: &Path) -> Result<()> {
        let mut doc = Self::join(inputs)?;
        doc.indent(INDENT);
        doc.save(output)
            .map_err(|e| Error::Merge(format!("Cannot write {}: {}", output.display(), e)))
    }
}

/// Converted documents waiting to be merged, in traversal order.
///
/// The documents are temporary files: they are deleted after a successful
/// merge, or when the unit is dropped on a failure path.
#[derive(Debug, Default)]
pub struct MergeUnit {
    documents: Vec<TempPath>,
}

impl MergeUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next converted document.
    pub fn push(&mut self, document: TempPath) {
        self.documents.push(document);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Paths of the queued documents.
    pub fn paths(&self) -> Vec<&Path> {
        self.documents.iter().map(|p| p.as_ref()).collect()
    }

    /// Merge into `output` and delete the inputs. Returns the number merged.
    pub fn merge_into<M: DocumentMerger + ?Sized>(self, merger: &M, output: &Path) -> Result<usize> {
        merger.merge(&self.paths(), output)?;
        let merged = self.documents.len();
        for document in self.documents {
            document.close()?;
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(id: &str, extra_ns: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2"{extra_ns}>
  <file original="{id}" datatype="x-sdlpackage"><header/><body><trans-unit id="1"><source>{id} text</source></trans-unit></body></file>
</xliff>"#
        )
    }

    fn queued(dir: &Path, name: &str, content: &str) -> TempPath {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        TempPath::try_from_path(path).unwrap()
    }

    #[test]
    fn test_merge_keeps_order_and_deletes_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let mut unit = MergeUnit::new();
        for id in ["c", "a", "b"] {
            unit.push(queued(dir.path(), &format!("{id}.xlf"), &document(id, "")));
        }
        assert_eq!(unit.len(), 3);
        let output = dir.path().join("out.xlf");

        assert_eq!(unit.merge_into(&XliffJoiner::new(), &output).unwrap(), 3);

        let merged = Document::open(&output).unwrap();
        let originals: Vec<String> = merged
            .root()
            .children_named("file")
            .filter_map(|f| f.attribute("original"))
            .collect();
        assert_eq!(originals, ["c", "a", "b"]);
        assert_eq!(merged.root().attribute("version").as_deref(), Some("1.2"));
        for id in ["c", "a", "b"] {
            assert!(!dir.path().join(format!("{id}.xlf")).exists());
        }
    }

    #[test]
    fn test_namespaces_from_later_inputs_are_added() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("1.xlf");
        let second = dir.path().join("2.xlf");
        std::fs::write(&first, document("1", "")).unwrap();
        std::fs::write(&second, document("2", r#" xmlns:sdl="http://sdl.com/FileTypes/SdlXliff/1.0""#)).unwrap();
        let output = dir.path().join("out.xlf");

        XliffJoiner.merge(&[first.as_path(), second.as_path()], &output).unwrap();
        let merged = Document::open(&output).unwrap();
        assert_eq!(
            merged.root().attribute_names().collect::<Vec<_>>(),
            vec!["version", "xmlns", "xmlns:sdl"]
        );
    }

    #[test]
    fn test_empty_merge_writes_empty_xliff() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.xlf");
        assert_eq!(MergeUnit::new().merge_into(&XliffJoiner, &output).unwrap(), 0);
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.ends_with(
            "<xliff version=\"1.2\" xmlns=\"urn:oasis:names:tc:xliff:document:1.2\"/>\n"
        ));
    }

    #[test]
    fn test_unreadable_input_is_a_merge_error() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.xlf");
        std::fs::write(&broken, "<xliff><file>").unwrap();
        let result = XliffJoiner.merge(&[broken.as_path()], &dir.path().join("out.xlf"));
        assert!(matches!(result, Err(Error::Merge(_))));
    }
}
