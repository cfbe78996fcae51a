//! Command-line surface. Every flag is optional.

use std::path::PathBuf;

use clap::Parser;

use crate::app::manifest::ManifestPreset;
use crate::infra::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "stateshare",
    author,
    version,
    about = "Snapshot project files into state.txt and copy it to the clipboard",
    long_about = None,
    after_help = "Environment:\n  STATESHARE_PRESET  Built-in file list, overriding config files\n  STATESHARE_OUTPUT  Output path, overriding config files"
)]
pub struct Cli {
    /// Built-in file list to collect
    #[arg(long, value_enum)]
    pub preset: Option<ManifestPreset>,
    /// Config file to use instead of .stateshare/config.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Where to write the snapshot
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
    /// Only write the output file
    #[arg(long)]
    pub no_clipboard: bool,
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(preset) = self.preset {
            config.set_preset(preset);
        }
        if let Some(output) = &self.output {
            config.set_output_path(output);
        }
        if self.no_clipboard {
            config.set_clipboard_enabled(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_without_arguments() {
        let cli = Cli::try_parse_from(["stateshare"]).unwrap();
        assert!(cli.preset.is_none());
        assert!(!cli.no_clipboard);
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "stateshare",
            "--preset",
            "backend",
            "--output",
            "out.txt",
            "--no-clipboard",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.manifest.preset().unwrap(), ManifestPreset::Backend);
        assert_eq!(config.output.path(), PathBuf::from("out.txt"));
        assert!(!config.clipboard.enabled());
    }

    #[test]
    fn rejects_unknown_preset() {
        assert!(Cli::try_parse_from(["stateshare", "--preset", "docs"]).is_err());
    }
}
