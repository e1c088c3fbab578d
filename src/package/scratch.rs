//! Scoped scratch storage for a single run.
//!
//! A [`Scratch`] owns a private temporary directory. Every file created in it
//! is a [`TempPath`] that deletes itself when dropped, and the directory
//! itself is removed with the `Scratch`, so no exit path leaves files behind.

use crate::common::{Error, Result};
use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempDir, TempPath};

/// Prefix of every run directory.
const RUN_PREFIX: &str = "sdlppx-";

/// Private working directory of one run.
#[derive(Debug)]
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    /// Create a run directory under the system temporary directory.
    pub fn new() -> Result<Self> {
        Self::in_dir(std::env::temp_dir())
    }

    /// Create a run directory under `parent`.
    pub fn in_dir<P: AsRef<Path>>(parent: P) -> Result<Self> {
        let dir = Builder::new().prefix(RUN_PREFIX).tempdir_in(parent)?;
        Ok(Self { dir })
    }

    /// Location of the run directory.
    #[inline]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Copy `reader` into a fresh scratch file named `<prefix>XXXXXX<suffix>`.
    ///
    /// The reader is an archive entry, so read failures are archive errors.
    pub fn extract<R: Read + ?Sized>(&self, reader: &mut R, prefix: &str, suffix: &str) -> Result<TempPath> {
        let mut file = Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(self.path())?;
        std::io::copy(reader, file.as_file_mut()).map_err(Error::archive)?;
        file.as_file_mut().flush()?;
        Ok(file.into_temp_path())
    }

    /// A path next to `base` with `suffix` appended, deleted on drop.
    ///
    /// Nothing is created; the path is handed to a collaborator that writes it.
    pub fn companion(base: &Path, suffix: &str) -> Result<TempPath> {
        let mut name: OsString = base.as_os_str().to_owned();
        name.push(suffix);
        Ok(TempPath::try_from_path(PathBuf::from(name))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_and_release() {
        let parent = tempfile::tempdir().unwrap();
        let scratch = Scratch::in_dir(parent.path()).unwrap();

        let mut data: &[u8] = b"<xliff/>";
        let extracted = scratch.extract(&mut data, "chapter1", ".sdlxliff").unwrap();
        let name = extracted.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("chapter1"));
        assert!(name.ends_with(".sdlxliff"));
        assert_eq!(std::fs::read(&extracted).unwrap(), b"<xliff/>");

        let kept = extracted.to_path_buf();
        drop(extracted);
        assert!(!kept.exists());
    }

    #[test]
    fn test_companion_is_removed_on_drop() {
        let parent = tempfile::tempdir().unwrap();
        let scratch = Scratch::in_dir(parent.path()).unwrap();
        let base = scratch.path().join("doc.sdlxliff");

        let companion = Scratch::companion(&base, ".xlf").unwrap();
        assert_eq!(companion.file_name().unwrap(), "doc.sdlxliff.xlf");
        std::fs::write(&companion, b"x").unwrap();
        let kept = companion.to_path_buf();
        drop(companion);
        assert!(!kept.exists());

        // Dropping a companion that was never written is fine
        drop(Scratch::companion(&base, ".skl").unwrap());
    }

    #[test]
    fn test_run_directory_removed_with_scratch() {
        let parent = tempfile::tempdir().unwrap();
        let scratch = Scratch::in_dir(parent.path()).unwrap();
        std::fs::write(scratch.path().join("left-over"), b"x").unwrap();
        assert_eq!(std::fs::read_dir(parent.path()).unwrap().count(), 1);
        drop(scratch);
        assert_eq!(std::fs::read_dir(parent.path()).unwrap().count(), 0);
    }
}
