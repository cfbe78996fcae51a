//! Domain models for manifests, sections, and formatted documents.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::errors::ShareError;

const HEADER_PREFIX: &str = "--- ";
const HEADER_SUFFIX: &str = " ---";
const FENCE: &str = "```";

/// A single relative path listed in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    path: String,
}

impl FileEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The path exactly as listed, used verbatim in section headers.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.path)
    }
}

impl From<&str> for FileEntry {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FileEntry {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Ordered, non-empty list of files to include in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileManifest {
    entries: Vec<FileEntry>,
}

impl FileManifest {
    /// Build a manifest, rejecting an empty entry list.
    pub fn new<I, E>(entries: I) -> Result<Self, ShareError>
    where
        I: IntoIterator<Item = E>,
        E: Into<FileEntry>,
    {
        let entries: Vec<FileEntry> = entries.into_iter().map(Into::into).collect();
        if entries.is_empty() {
            return Err(ShareError::EmptyManifest);
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter()
    }
}

/// One file's contribution to a document: its path and raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub path: String,
    pub content: String,
}

impl Section {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(HEADER_PREFIX);
        out.push_str(&self.path);
        out.push_str(HEADER_SUFFIX);
        out.push('\n');
        out.push_str(FENCE);
        out.push('\n');
        out.push_str(&self.content);
        // closing fence always starts its own line
        if !self.content.is_empty() && !self.content.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(FENCE);
        out.push_str("\n\n");
    }
}

/// Concatenation of sections in manifest order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedDocument {
    sections: Vec<Section>,
}

impl FormattedDocument {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// First section whose header names `path`.
    pub fn section(&self, path: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.path == path)
    }

    /// Render the document in its on-disk text form.
    pub fn render(&self) -> String {
        let capacity = self
            .sections
            .iter()
            .map(|section| section.path.len() + section.content.len() + 24)
            .sum();
        let mut out = String::with_capacity(capacity);
        for section in &self.sections {
            section.write_to(&mut out);
        }
        out
    }

    /// Parse a rendered document back into sections.
    ///
    /// A section's content ends at the first line consisting solely of the fence marker, so
    /// files that themselves contain such a line cannot be recovered exactly.
    pub fn parse(text: &str) -> Result<Self, DocumentParseError> {
        let mut sections = Vec::new();
        let mut lines = text.split_inclusive('\n').enumerate();

        while let Some((index, header)) = lines.next() {
            let line_no = index + 1;
            let path = parse_header(header).ok_or(DocumentParseError::MissingHeader {
                line: line_no,
            })?;

            match lines.next() {
                Some((_, open)) if trim_newline(open) == FENCE => {}
                _ => return Err(DocumentParseError::MissingOpenFence { line: line_no + 1 }),
            }

            let mut content = String::new();
            let mut closed = false;
            for (_, line) in lines.by_ref() {
                if trim_newline(line) == FENCE {
                    closed = true;
                    break;
                }
                content.push_str(line);
            }
            if !closed {
                return Err(DocumentParseError::UnterminatedSection { path });
            }

            match lines.next() {
                Some((_, "\n")) => {}
                Some((index, _)) => {
                    return Err(DocumentParseError::MissingSeparator { line: index + 1 });
                }
                None => return Err(DocumentParseError::UnterminatedSection { path }),
            }

            sections.push(Section { path, content });
        }

        Ok(Self { sections })
    }
}

impl fmt::Display for FormattedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn parse_header(line: &str) -> Option<String> {
    trim_newline(line)
        .strip_prefix(HEADER_PREFIX)?
        .strip_suffix(HEADER_SUFFIX)
        .map(str::to_owned)
}

fn trim_newline(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}

/// Error returned when [`FormattedDocument::parse`] meets text it did not render.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DocumentParseError {
    #[error("expected section header at line {line}")]
    MissingHeader { line: usize },
    #[error("expected opening fence at line {line}")]
    MissingOpenFence { line: usize },
    #[error("section '{path}' is not terminated")]
    UnterminatedSection { path: String },
    #[error("expected blank separator at line {line}")]
    MissingSeparator { line: usize },
}

/// Clipboard mechanism appropriate for a host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardTarget {
    MacOs,
    Linux,
    Unsupported(String),
}

impl ClipboardTarget {
    /// Target for the platform this binary was compiled for.
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier (as in [`std::env::consts::OS`]) to a target.
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" => ClipboardTarget::MacOs,
            "linux" => ClipboardTarget::Linux,
            other => ClipboardTarget::Unsupported(other.to_owned()),
        }
    }

    /// Command that writes stdin to the clipboard on this target.
    pub fn command(&self) -> Result<ClipboardCommand, ShareError> {
        match self {
            ClipboardTarget::MacOs => Ok(ClipboardCommand::new("pbcopy", &[])),
            ClipboardTarget::Linux => Ok(ClipboardCommand::new(
                "xclip",
                &["-selection", "clipboard"],
            )),
            ClipboardTarget::Unsupported(os) => {
                Err(ShareError::UnsupportedPlatform { os: os.clone() })
            }
        }
    }
}

/// Program plus explicit argument list; never interpreted by a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl ClipboardCommand {
    pub const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self { program, args }
    }
}

impl fmt::Display for ClipboardCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program)?;
        for arg in self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Resolve a manifest entry against a base directory.
pub fn resolve_entry(base: &Path, entry: &FileEntry) -> PathBuf {
    base.join(entry.path())
}
