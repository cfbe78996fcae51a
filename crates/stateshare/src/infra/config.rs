//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::app::collect::DEFAULT_OUTPUT;
use crate::app::manifest::ManifestPreset;
use crate::domain::model::FileManifest;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".stateshare/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub manifest: Manifest,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub clipboard: Clipboard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Manifest {
    #[serde(default)]
    preset: Option<String>,
    #[serde(default)]
    files: Option<Vec<String>>,
}

impl Manifest {
    pub fn preset(&self) -> Result<ManifestPreset> {
        match &self.preset {
            Some(name) => name
                .parse()
                .with_context(|| format!("invalid manifest preset in config: {name}")),
            None => Ok(ManifestPreset::default()),
        }
    }

    /// Explicit file list, taking precedence over the preset when present.
    pub fn files(&self) -> Option<&[String]> {
        self.files.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Output {
    #[serde(default)]
    path: Option<PathBuf>,
}

impl Output {
    pub fn path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Clipboard {
    #[serde(default)]
    enabled: Option<bool>,
}

impl Clipboard {
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    preset: Option<String>,
    output: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            preset: env::var("STATESHARE_PRESET").ok(),
            output: env::var("STATESHARE_OUTPUT").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(preset: &str, output: &str) -> Self {
        Self {
            preset: Some(preset.to_owned()),
            output: Some(output.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    ///
    /// `explicit` replaces the workspace config file and must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("config file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => workspace_config_path()?,
        };
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            manifest: merge_manifest(self.manifest, other.manifest),
            output: Output {
                path: other.output.path.or(self.output.path),
            },
            clipboard: Clipboard {
                enabled: other.clipboard.enabled.or(self.clipboard.enabled),
            },
        }
    }

    /// Override the manifest with a preset, discarding any configured file list.
    pub fn set_preset(&mut self, preset: ManifestPreset) {
        self.manifest.preset = Some(preset.as_str().to_owned());
        self.manifest.files = None;
    }

    pub fn set_output_path(&mut self, path: impl Into<PathBuf>) {
        self.output.path = Some(path.into());
    }

    pub fn set_clipboard_enabled(&mut self, enabled: bool) {
        self.clipboard.enabled = Some(enabled);
    }

    /// Resolve the manifest this run should collect.
    pub fn resolve_manifest(&self) -> Result<FileManifest> {
        let manifest = match self.manifest.files() {
            Some(files) => FileManifest::new(files.iter().cloned())?,
            None => self.manifest.preset()?.manifest()?,
        };
        Ok(manifest)
    }
}

fn merge_manifest(base: Manifest, overlay: Manifest) -> Manifest {
    // a layer naming a preset resets file lists from the layers beneath it
    match (overlay.preset, overlay.files) {
        (preset, Some(files)) => Manifest {
            preset: preset.or(base.preset),
            files: Some(files),
        },
        (Some(preset), None) => Manifest {
            preset: Some(preset),
            files: None,
        },
        (None, None) => base,
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("stateshare/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(preset) = env.preset {
        config.manifest.preset = Some(preset);
        config.manifest.files = None;
    }
    if let Some(output) = env.output {
        config.output.path = Some(PathBuf::from(output));
    }
    config
}
