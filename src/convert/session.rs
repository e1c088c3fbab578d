//! One conversion run over one package.

use super::converter::DocumentConverter;
use super::options::PackageOptions;
use crate::common::constants::{DOCUMENT_EXTENSION, SKELETON_SUFFIX, TOOL_ID, VERSION};
use crate::common::{Error, Result};
use crate::package::{
    ArchiveWriter, EntryClassifier, EntryKind, EntryStream, ResolvedLanguages, Scratch, read_package_languages,
};
use crate::xliff::{DocumentMerger, MergeUnit, Provenance, patch_header};
use std::fmt;
use std::path::Path;
use tempfile::TempPath;

/// Extension of converted documents in the scratch directory.
const XLIFF_SUFFIX: &str = ".xlf";

/// Progress of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Init,
    LanguagesResolved,
    Traversing,
    Merging,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::LanguagesResolved => "languages resolved",
            Stage::Traversing => "traversing",
            Stage::Merging => "merging",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Entry counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Entries converted and merged
    pub converted: usize,
    /// Convertible entries copied through after their conversion failed
    pub fallbacks: usize,
    /// Entries copied through by classification
    pub passthrough: usize,
    /// Entries left out of the output archive
    pub excluded: usize,
}

/// State of one run: options, scratch directory, resolved languages and the
/// current stage.
///
/// Sessions share nothing, so separate packages can be processed
/// concurrently by separate sessions.
#[derive(Debug)]
pub struct Session {
    options: PackageOptions,
    scratch: Scratch,
    stage: Stage,
    languages: Option<ResolvedLanguages>,
}

impl Session {
    /// Start a session, creating its scratch directory.
    pub fn new(options: PackageOptions) -> Result<Self> {
        let scratch = match &options.work_dir {
            Some(dir) => Scratch::in_dir(dir)?,
            None => Scratch::new()?,
        };
        Ok(Self {
            options,
            scratch,
            stage: Stage::Init,
            languages: None,
        })
    }

    #[inline]
    pub fn options(&self) -> &PackageOptions {
        &self.options
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Languages selected for the run, once resolved.
    #[inline]
    pub fn languages(&self) -> Option<&ResolvedLanguages> {
        self.languages.as_ref()
    }

    fn enter(&mut self, stage: Stage) {
        log::debug!("Session stage {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    fn fail(&mut self, err: Error) -> Error {
        log::error!("Conversion of {} failed during {}: {}", self.options.package.display(), self.stage, err);
        self.stage = Stage::Failed;
        err
    }

    /// Read the package descriptor and resolve the requested languages.
    pub fn resolve_languages(&mut self) -> Result<&ResolvedLanguages> {
        let resolved = read_package_languages(&self.options.package, self.scratch.path()).and_then(|languages| {
            languages.resolve(
                self.options.source_language.as_deref(),
                self.options.target_language.as_deref(),
            )
        });
        match resolved {
            Ok(languages) => {
                log::debug!("Resolved languages {} -> {}", languages.source, languages.target);
                self.enter(Stage::LanguagesResolved);
                Ok(self.languages.insert(languages))
            },
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Stream every entry into the output archive, converting target-language
    /// documents on the way. Returns the converted documents to merge.
    pub fn traverse<C>(&mut self, converter: &C, summary: &mut RunSummary) -> Result<MergeUnit>
    where
        C: DocumentConverter + ?Sized,
    {
        let languages = match self.languages.clone() {
            Some(languages) => languages,
            None => self.resolve_languages()?.clone(),
        };
        self.enter(Stage::Traversing);
        match self.traverse_entries(converter, &languages, summary) {
            Ok(unit) => Ok(unit),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn traverse_entries<C>(
        &self,
        converter: &C,
        languages: &ResolvedLanguages,
        summary: &mut RunSummary,
    ) -> Result<MergeUnit>
    where
        C: DocumentConverter + ?Sized,
    {
        let classifier = EntryClassifier::new(languages);
        let mut stream = EntryStream::open(&self.options.package)?;
        let mut writer = ArchiveWriter::create(&self.options.skeleton)?;
        let mut unit = MergeUnit::new();

        while let Some(entry) = stream.next_entry()? {
            let kind = classifier.classify(&entry);
            let name = entry.path().to_string();
            log::debug!("Entry {} ({}): {:?}", entry.index(), name, kind);

            match kind {
                EntryKind::Excluded => summary.excluded += 1,
                EntryKind::Passthrough => {
                    let mut reader = stream.open_entry(entry)?;
                    writer.copy_entry(&name, &mut reader)?;
                    summary.passthrough += 1;
                },
                EntryKind::Convert => {
                    let extracted = {
                        let mut reader = stream.open_entry(entry)?;
                        self.scratch.extract(&mut reader, "entry", DOCUMENT_EXTENSION)?
                    };
                    match self.convert_entry(converter, languages, &name, &extracted) {
                        Ok((xliff, skeleton)) => {
                            writer.write_skeleton(&name, &skeleton)?;
                            unit.push(xliff);
                            summary.converted += 1;
                        },
                        Err(e) => {
                            log::warn!("Copying {} unchanged: {}", name, e);
                            writer.copy_file(&name, &extracted)?;
                            summary.fallbacks += 1;
                        },
                    }
                },
            }
        }

        writer.finish()?;
        Ok(unit)
    }

    /// Convert and patch one extracted entry. Every failure is reported as
    /// a recoverable [`Error::Conversion`].
    fn convert_entry<C>(
        &self,
        converter: &C,
        languages: &ResolvedLanguages,
        name: &str,
        extracted: &Path,
    ) -> Result<(TempPath, TempPath)>
    where
        C: DocumentConverter + ?Sized,
    {
        match self.try_convert_entry(converter, languages, name, extracted) {
            Err(e) if !e.is_recoverable() => Err(Error::Conversion(e.to_string())),
            converted => converted,
        }
    }

    fn try_convert_entry<C>(
        &self,
        converter: &C,
        languages: &ResolvedLanguages,
        name: &str,
        extracted: &Path,
    ) -> Result<(TempPath, TempPath)>
    where
        C: DocumentConverter + ?Sized,
    {
        let xliff = Scratch::companion(extracted, XLIFF_SUFFIX)?;
        let skeleton = Scratch::companion(extracted, SKELETON_SUFFIX)?;
        let request = self.options.request_for(languages, extracted, &xliff, &skeleton);

        converter.convert(&request)?;
        if !xliff.exists() || !skeleton.exists() {
            return Err(Error::Conversion("converter reported success but wrote no output".to_string()));
        }
        let provenance = Provenance {
            package: &self.options.package,
            entry: name,
            skeleton: &self.options.skeleton,
        };
        patch_header(&xliff, &provenance)?;
        Ok((xliff, skeleton))
    }

    /// Merge the converted documents into the composite XLIFF document.
    pub fn merge<M>(&mut self, unit: MergeUnit, merger: &M) -> Result<usize>
    where
        M: DocumentMerger + ?Sized,
    {
        self.enter(Stage::Merging);
        match unit.merge_into(merger, &self.options.xliff) {
            Ok(merged) => {
                self.enter(Stage::Done);
                Ok(merged)
            },
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Run every stage.
    pub fn run<C, M>(&mut self, converter: &C, merger: &M) -> Result<RunSummary>
    where
        C: DocumentConverter + ?Sized,
        M: DocumentMerger + ?Sized,
    {
        log::info!(
            "{} {}: converting {} to {}",
            TOOL_ID,
            VERSION,
            self.options.package.display(),
            self.options.xliff.display()
        );
        let mut summary = RunSummary::default();
        self.resolve_languages()?;
        let unit = self.traverse(converter, &mut summary)?;
        self.merge(unit, merger)?;
        log::info!(
            "Converted {}: {} documents, {} fallbacks, {} copied, {} excluded",
            self.options.package.display(),
            summary.converted,
            summary.fallbacks,
            summary.passthrough,
            summary.excluded
        );
        Ok(summary)
    }
}
