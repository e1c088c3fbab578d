//! Forward-only traversal of package entries.
//!
//! [`EntryStream`] hands out one [`EntryView`] per archive entry, in archive
//! order. A view is a move-only token: opening it consumes it, so an entry can
//! be read at most once, and dropping it skips the entry.

use crate::common::Result;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// One archive entry, valid for a single read.
#[derive(Debug, PartialEq, Eq)]
pub struct EntryView {
    index: usize,
    path: String,
    /// Byte offset of the last `/`, if any
    separator: Option<usize>,
    is_dir: bool,
}

impl EntryView {
    pub(crate) fn new(index: usize, path: String, is_dir: bool) -> Self {
        let trimmed = path.strip_suffix('/').unwrap_or(&path);
        let separator = memchr::memrchr(b'/', trimmed.as_bytes());
        Self {
            index,
            path,
            separator,
            is_dir,
        }
    }

    /// Position of the entry in the archive.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Full entry path, e.g. `de-DE/chapter1.docx.sdlxliff`.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Everything before the last `/`, e.g. `de-DE`. `None` for top-level entries.
    pub fn parent(&self) -> Option<&str> {
        self.separator.map(|at| &self.path[..at])
    }

    /// Last path component.
    pub fn file_name(&self) -> &str {
        let name = match self.separator {
            Some(at) => &self.path[at + 1..],
            None => &self.path,
        };
        name.strip_suffix('/').unwrap_or(name)
    }

    /// Whether the entry is a directory record.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// Single-pass reader over the entries of a package.
pub struct EntryStream<R> {
    archive: ZipArchive<R>,
    next: usize,
}

impl EntryStream<BufReader<File>> {
    /// Open a package file for traversal.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(crate::common::Error::archive)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> EntryStream<R> {
    /// Start a traversal over an archive reader.
    pub fn new(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive, next: 0 })
    }

    /// Total number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Whether the archive has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Entries not yet handed out.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.archive.len().saturating_sub(self.next)
    }

    /// Advance to the next entry.
    pub fn next_entry(&mut self) -> Result<Option<EntryView>> {
        if self.next >= self.archive.len() {
            return Ok(None);
        }
        let index = self.next;
        let view = {
            let file = self.archive.by_index(index)?;
            EntryView::new(index, file.name().to_string(), file.is_dir())
        };
        self.next += 1;
        Ok(Some(view))
    }

    /// Consume a view and stream its decompressed bytes.
    ///
    /// Views must be opened before the stream advances past them.
    pub fn open_entry(&mut self, entry: EntryView) -> Result<impl Read + '_> {
        debug_assert_eq!(entry.index + 1, self.next, "entry opened after the stream advanced");
        Ok(self.archive.by_index(entry.index)?)
    }
}
