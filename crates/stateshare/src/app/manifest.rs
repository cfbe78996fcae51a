//! Built-in manifests for the project snapshots.

use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ShareError;
use crate::domain::model::FileManifest;

const BACKEND_FILES: &[&str] = &[
    "src-tauri/src/main.rs",
    "src-tauri/src/game.rs",
    "src-tauri/src/sprites.rs",
    "src-tauri/src/traits.rs",
    "src-tauri/src/constants.rs",
    "src-tauri/src/collision.rs",
    "src-tauri/tauri.conf.json",
];

const FRONTEND_FILES: &[&str] = &[
    "src/routes/+layout.ts",
    "src/routes/+layout.svelte",
    "src/routes/+page.svelte",
    "src/lib/Canvas.svelte",
    "src/lib/Explosion.svelte",
    "src/lib/index.ts",
    "src/global.css",
];

/// Named file lists shipped with the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ManifestPreset {
    /// Backend sources followed by the frontend sources.
    #[default]
    Full,
    /// Tauri backend sources and configuration.
    Backend,
    /// Svelte routes, components, and styles.
    Frontend,
}

impl ManifestPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestPreset::Full => "full",
            ManifestPreset::Backend => "backend",
            ManifestPreset::Frontend => "frontend",
        }
    }

    /// Paths listed by the preset, in emission order.
    pub fn files(&self) -> Vec<&'static str> {
        match self {
            ManifestPreset::Full => BACKEND_FILES.iter().chain(FRONTEND_FILES).copied().collect(),
            ManifestPreset::Backend => BACKEND_FILES.to_vec(),
            ManifestPreset::Frontend => FRONTEND_FILES.to_vec(),
        }
    }

    pub fn manifest(&self) -> Result<FileManifest, ShareError> {
        FileManifest::new(self.files())
    }
}

impl FromStr for ManifestPreset {
    type Err = ManifestPresetParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" | "all" => Ok(ManifestPreset::Full),
            "backend" | "rust" | "tauri" => Ok(ManifestPreset::Backend),
            "frontend" | "web" | "svelte" => Ok(ManifestPreset::Frontend),
            other => Err(ManifestPresetParseError::UnknownPreset(other.to_string())),
        }
    }
}

/// Error returned when parsing a [`ManifestPreset`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ManifestPresetParseError {
    #[error("unknown manifest preset '{0}'")]
    UnknownPreset(String),
}
