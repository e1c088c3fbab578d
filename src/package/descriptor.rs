//! Project descriptor (`.sdlproj`) reading.
//!
//! The descriptor lists the language directions a package was prepared for:
//!
//! ```xml
//! <Project>
//!   <LanguageDirections>
//!     <LanguageDirection SourceLanguageCode="en-US" TargetLanguageCode="de-DE"/>
//!   </LanguageDirections>
//! </Project>
//! ```

use crate::common::constants::PROJECT_EXTENSION;
use crate::common::{Error, LanguageRole, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use tempfile::Builder;
use zip::ZipArchive;

/// A (source, target) language pair declared by the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LanguageDirection {
    pub source: String,
    pub target: String,
}

/// Languages discovered in a package, in first-seen order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageLanguages {
    #[serde(rename = "srcLangs")]
    source: Vec<String>,
    #[serde(rename = "tgtLangs")]
    target: Vec<String>,
    #[serde(skip)]
    directions: Vec<LanguageDirection>,
}

impl PackageLanguages {
    /// Parse the language directions of a descriptor document.
    pub fn from_descriptor(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut languages = Self::default();
        let mut buf = Vec::new();
        let mut depth = 0usize;
        let mut in_directions = false;
        let mut found_block = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    depth += 1;
                    languages.visit(e, depth, &mut in_directions, &mut found_block)?;
                },
                Ok(Event::Empty(ref e)) => {
                    // An empty <LanguageDirections/> block opens and closes at once
                    let mut open = in_directions;
                    languages.visit(e, depth + 1, &mut open, &mut found_block)?;
                },
                Ok(Event::End(_)) => {
                    if depth == 2 {
                        in_directions = false;
                    }
                    depth = depth.saturating_sub(1);
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::DescriptorParse(format!("XML parsing error: {}", e)));
                },
                _ => {},
            }
            buf.clear();
        }

        if !found_block {
            return Err(Error::DescriptorParse("No LanguageDirections element".to_string()));
        }
        if languages.directions.is_empty() {
            return Err(Error::DescriptorParse("No LanguageDirection records".to_string()));
        }
        Ok(languages)
    }

    fn visit(&mut self, e: &BytesStart<'_>, depth: usize, in_directions: &mut bool, found_block: &mut bool) -> Result<()> {
        match e.name().as_ref() {
            b"LanguageDirections" if depth == 2 && !*found_block => {
                *found_block = true;
                *in_directions = true;
            },
            b"LanguageDirection" if depth == 3 && *in_directions => {
                let direction = Self::parse_direction(e)?;
                self.add(direction);
            },
            _ => {},
        }
        Ok(())
    }

    fn parse_direction(e: &BytesStart<'_>) -> Result<LanguageDirection> {
        let mut source = None;
        let mut target = None;

        for attr in e.attributes() {
            let attr = attr.map_err(|e| Error::DescriptorParse(format!("Invalid attribute: {}", e)))?;
            let value = attr
                .unescape_value()
                .map_err(|e| Error::DescriptorParse(format!("Invalid attribute value: {}", e)))?;
            match attr.key.as_ref() {
                b"SourceLanguageCode" => source = Some(value.into_owned()),
                b"TargetLanguageCode" => target = Some(value.into_owned()),
                _ => {},
            }
        }

        match (source, target) {
            (Some(source), Some(target)) => Ok(LanguageDirection { source, target }),
            _ => Err(Error::DescriptorParse(
                "LanguageDirection without SourceLanguageCode or TargetLanguageCode".to_string(),
            )),
        }
    }

    fn add(&mut self, direction: LanguageDirection) {
        if !self.source.contains(&direction.source) {
            self.source.push(direction.source.clone());
        }
        if !self.target.contains(&direction.target) {
            self.target.push(direction.target.clone());
        }
        if !self.directions.contains(&direction) {
            self.directions.push(direction);
        }
    }

    /// Source language codes.
    #[inline]
    pub fn source(&self) -> &[String] {
        &self.source
    }

    /// Target language codes.
    #[inline]
    pub fn target(&self) -> &[String] {
        &self.target
    }

    /// Declared directions.
    #[inline]
    pub fn directions(&self) -> &[LanguageDirection] {
        &self.directions
    }

    /// Codes valid for a role.
    pub fn codes(&self, role: LanguageRole) -> &[String] {
        match role {
            LanguageRole::Source => &self.source,
            LanguageRole::Target => &self.target,
        }
    }

    /// `{"srcLangs": [...], "tgtLangs": [...]}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "srcLangs": self.source,
            "tgtLangs": self.target,
        })
    }
}

/// Read the languages of a package, using `scratch` for the descriptor copy.
///
/// The first entry whose name ends with `.sdlproj` is extracted next to the
/// other run files and removed again before returning.
pub fn read_package_languages<P: AsRef<Path>, S: AsRef<Path>>(package: P, scratch: S) -> Result<PackageLanguages> {
    let package = package.as_ref();
    let file = File::open(package).map_err(Error::archive)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() || !entry.name().ends_with(PROJECT_EXTENSION) {
            continue;
        }

        let mut copy = Builder::new()
            .prefix("project")
            .suffix(PROJECT_EXTENSION)
            .tempfile_in(scratch.as_ref())?;
        std::io::copy(&mut entry, copy.as_file_mut()).map_err(Error::archive)?;
        copy.as_file_mut().flush()?;

        let xml = std::fs::read(copy.path())?;
        log::debug!("Read project file {} ({} bytes)", entry.name(), xml.len());
        return PackageLanguages::from_descriptor(&xml);
    }

    Err(Error::MissingProjectDescriptor(package.display().to_string()))
}

/// Read the languages of a package using the system temporary directory.
pub fn package_languages<P: AsRef<Path>>(package: P) -> Result<PackageLanguages> {
    read_package_languages(package, std::env::temp_dir())
}

/// Language report for a package as JSON.
///
/// A package without a project file yields
/// `{"result": "Failed", "reason": "Project file not found"}`.
pub fn package_languages_json<P: AsRef<Path>>(package: P) -> Result<serde_json::Value> {
    match package_languages(package) {
        Ok(languages) => Ok(languages.to_json()),
        Err(Error::MissingProjectDescriptor(_)) => Ok(serde_json::json!({
            "result": "Failed",
            "reason": "Project file not found",
        })),
        Err(e) => Err(e),
    }
}
