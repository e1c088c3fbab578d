//! Output archive writing.
//!
//! Entries are appended in the order they are produced and streamed straight
//! into the ZIP writer; nothing but the current copy buffer is held in memory.

use crate::common::constants::SKELETON_SUFFIX;
use crate::common::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Read, Seek, Write};
use std::path::Path;
use zip::{CompressionMethod, DateTime};
use zip::write::{SimpleFileOptions, ZipWriter};

/// Name of the skeleton entry that replaces a converted document.
///
/// ```
/// use sdlppx::package::skeleton_entry_name;
/// assert_eq!(skeleton_entry_name("de-DE/a.sdlxliff"), "de-DE/a.sdlxliff.skl");
/// ```
#[inline]
pub fn skeleton_entry_name(entry: &str) -> String {
    format!("{}{}", entry, SKELETON_SUFFIX)
}

/// Streaming writer for the output archive.
pub struct ArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    entries: usize,
}

impl ArchiveWriter<BufWriter<File>> {
    /// Create (or truncate) the output archive at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path).map_err(Error::archive)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Seek> ArchiveWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            zip: ZipWriter::new(inner),
            entries: 0,
        }
    }

    fn options() -> SimpleFileOptions {
        // fixed DOS epoch timestamp
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
    }

    /// Stream `reader` into a new deflated entry.
    pub fn copy_entry<R: Read + ?Sized>(&mut self, name: &str, reader: &mut R) -> Result<u64> {
        self.zip.start_file(name, Self::options())?;
        let written = std::io::copy(reader, &mut self.zip).map_err(Error::archive)?;
        self.entries += 1;
        Ok(written)
    }

    /// Copy a file from disk into a new entry.
    pub fn copy_file(&mut self, name: &str, path: &Path) -> Result<u64> {
        let mut file = File::open(path)?;
        self.copy_entry(name, &mut file)
    }

    /// Write the skeleton of a converted entry under `<entry>.skl`.
    pub fn write_skeleton(&mut self, entry: &str, skeleton: &Path) -> Result<u64> {
        self.copy_file(&skeleton_entry_name(entry), skeleton)
    }

    /// Number of entries written so far.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Write the central directory and flush.
    pub fn finish(self) -> Result<W> {
        let mut inner = self.zip.finish()?;
        inner.flush().map_err(Error::archive)?;
        Ok(inner)
    }
}
