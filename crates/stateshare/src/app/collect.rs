//! Gathers manifest files into a formatted document and commits it to disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info};

use crate::domain::errors::ShareError;
use crate::domain::model::{FileManifest, FormattedDocument, Section, resolve_entry};

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "state.txt";

/// Reads every manifest entry and writes the rendered document in one step.
#[derive(Debug, Clone)]
pub struct Collector {
    manifest: FileManifest,
    base_dir: PathBuf,
}

impl Collector {
    /// Collector resolving entries against the current working directory.
    pub fn new(manifest: FileManifest) -> Self {
        Self {
            manifest,
            base_dir: PathBuf::new(),
        }
    }

    /// Resolve manifest entries against `base_dir` instead of the working directory.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn manifest(&self) -> &FileManifest {
        &self.manifest
    }

    /// Read all files and build the document without touching the output path.
    pub fn gather(&self) -> Result<FormattedDocument, ShareError> {
        let mut sections = Vec::with_capacity(self.manifest.len());
        for entry in self.manifest.iter() {
            let path = resolve_entry(&self.base_dir, entry);
            debug!(path = %path.display(), "reading manifest entry");
            let content =
                fs::read_to_string(&path).map_err(|err| ShareError::from_read(&path, err))?;
            sections.push(Section::new(entry.as_str(), content));
        }
        Ok(FormattedDocument::new(sections))
    }

    /// Build the document and replace `output_path` with it.
    ///
    /// Nothing is written unless every file was read; on failure the previous output (or its
    /// absence) is preserved.
    pub fn collect(&self, output_path: &Path) -> Result<FormattedDocument, ShareError> {
        let document = self.gather()?;
        let rendered = document.render();
        commit(output_path, rendered.as_bytes())?;
        info!(
            sections = document.sections().len(),
            bytes = rendered.len(),
            output = %output_path.display(),
            "collected project state"
        );
        Ok(document)
    }
}

/// Functional shorthand for [`Collector::collect`].
pub fn collect(
    manifest: &FileManifest,
    output_path: &Path,
) -> Result<FormattedDocument, ShareError> {
    Collector::new(manifest.clone()).collect(output_path)
}

fn commit(output_path: &Path, data: &[u8]) -> Result<(), ShareError> {
    let io_err = |source| ShareError::Io {
        path: output_path.to_path_buf(),
        source,
    };

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = stage_in(dir).map_err(io_err)?;
    // keep the mode of the file being replaced
    if let Ok(existing) = fs::metadata(output_path) {
        staged
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(io_err)?;
    }
    staged.write_all(data).map_err(io_err)?;
    staged.as_file().sync_all().map_err(io_err)?;
    staged
        .persist(output_path)
        .map_err(|err| io_err(err.error))?;
    Ok(())
}

/// Staged file created with the default mode for new files, subject to the umask.
#[cfg(unix)]
fn stage_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    Builder::new()
        .prefix(".stateshare")
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn stage_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    Builder::new().prefix(".stateshare").tempfile_in(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn sections_follow_manifest_order() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "z.rs", "last\n");
        write(temp.path(), "src/a.rs", "first\n");

        let manifest = FileManifest::new(["z.rs", "src/a.rs", "z.rs"]).unwrap();
        let document = Collector::new(manifest)
            .with_base_dir(temp.path())
            .gather()
            .unwrap();

        let paths: Vec<&str> = document.sections().iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, ["z.rs", "src/a.rs", "z.rs"]);
        assert_eq!(document.section("src/a.rs").unwrap().content, "first\n");
    }

    #[test]
    fn content_is_copied_verbatim() {
        let temp = tempfile::tempdir().unwrap();
        let raw = "```rust\nlet x = 1;\n```\n\t--- not a header ---\r\n";
        write(temp.path(), "notes.md", raw);

        let manifest = FileManifest::new(["notes.md"]).unwrap();
        let document = Collector::new(manifest)
            .with_base_dir(temp.path())
            .gather()
            .unwrap();
        assert_eq!(document.sections()[0].content, raw);
    }

    #[test]
    fn collect_overwrites_existing_output() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "a.txt", "fresh\n");
        let output = temp.path().join("state.txt");
        fs::write(&output, "stale content that is much longer than the new one\n").unwrap();

        let manifest = FileManifest::new(["a.txt"]).unwrap();
        Collector::new(manifest)
            .with_base_dir(temp.path())
            .collect(&output)
            .unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "--- a.txt ---\n```\nfresh\n```\n\n"
        );
    }

    #[test]
    fn missing_file_reports_not_found() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "a.txt", "present\n");

        let manifest = FileManifest::new(["a.txt", "missing.txt"]).unwrap();
        let err = Collector::new(manifest)
            .with_base_dir(temp.path())
            .collect(&temp.path().join("state.txt"))
            .unwrap_err();

        assert!(
            matches!(err, ShareError::FileNotFound { ref path } if path.ends_with("missing.txt"))
        );
    }

    #[test]
    fn non_utf8_content_is_an_io_error() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("blob.bin"), [0xff, 0xfe]).unwrap();

        let manifest = FileManifest::new(["blob.bin"]).unwrap();
        let err = Collector::new(manifest)
            .with_base_dir(temp.path())
            .gather()
            .unwrap_err();
        match err {
            ShareError::Io { path, source } => {
                assert!(path.ends_with("blob.bin"));
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn collect_keeps_existing_output_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "a.txt", "alpha\n");
        let output = temp.path().join("state.txt");
        fs::write(&output, "old\n").unwrap();
        fs::set_permissions(&output, fs::Permissions::from_mode(0o644)).unwrap();

        let manifest = FileManifest::new(["a.txt"]).unwrap();
        Collector::new(manifest)
            .with_base_dir(temp.path())
            .collect(&output)
            .unwrap();

        let mode = fs::metadata(&output).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn new_output_gets_default_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "a.txt", "alpha\n");
        let reference = temp.path().join("reference.txt");
        fs::write(&reference, "").unwrap();
        let output = temp.path().join("state.txt");

        let manifest = FileManifest::new(["a.txt"]).unwrap();
        Collector::new(manifest)
            .with_base_dir(temp.path())
            .collect(&output)
            .unwrap();

        let mode = |path: &Path| fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&output), mode(&reference));
    }

    #[test]
    fn directory_entry_is_an_io_error() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();

        let manifest = FileManifest::new(["src"]).unwrap();
        let err = Collector::new(manifest)
            .with_base_dir(temp.path())
            .gather()
            .unwrap_err();
        assert!(matches!(err, ShareError::Io { .. }));
    }
}
