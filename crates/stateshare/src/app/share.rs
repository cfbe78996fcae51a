//! Full snapshot run: collect into the output file, then publish it.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::app::collect::Collector;
use crate::app::publish::Publisher;
use crate::domain::errors::ShareError;
use crate::domain::model::{FileManifest, FormattedDocument};
use crate::infra::clipboard::CommandRunner;
use crate::infra::config::Config;

/// Runtime options for a single snapshot.
#[derive(Debug, Clone)]
pub struct ShareOptions {
    pub manifest: FileManifest,
    pub output_path: PathBuf,
    pub copy_to_clipboard: bool,
}

impl ShareOptions {
    /// Build options from resolved configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            manifest: config.resolve_manifest()?,
            output_path: config.output.path(),
            copy_to_clipboard: config.clipboard.enabled(),
        })
    }
}

/// Result of a snapshot run.
#[derive(Debug, Clone)]
pub struct ShareResult {
    pub document: FormattedDocument,
    pub output_path: PathBuf,
    pub copied_to_clipboard: bool,
}

/// Collect the manifest and hand the written file to `publisher`.
///
/// Collection failures abort before the clipboard is touched.
pub fn share<R: CommandRunner>(
    options: &ShareOptions,
    publisher: &mut Publisher<R>,
) -> Result<ShareResult, ShareError> {
    let document = Collector::new(options.manifest.clone()).collect(&options.output_path)?;

    if options.copy_to_clipboard {
        publisher.publish(&options.output_path)?;
    } else {
        info!("clipboard disabled, output written to file only");
    }

    Ok(ShareResult {
        document,
        output_path: options.output_path.clone(),
        copied_to_clipboard: options.copy_to_clipboard,
    })
}
