use anyhow::Context;
use clap::Parser;

use stateshare::app::publish::Publisher;
use stateshare::app::share::{ShareOptions, share};
use stateshare::cli::Cli;
use stateshare::infra::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    stateshare::init(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    let options = ShareOptions::from_config(&config)?;
    let result = share(&options, &mut Publisher::new())
        .with_context(|| format!("failed to share {}", options.output_path.display()))?;

    eprintln!(
        "wrote {} section(s) to {}{}",
        result.document.sections().len(),
        result.output_path.display(),
        if result.copied_to_clipboard {
            " and copied it to the clipboard"
        } else {
            ""
        }
    );
    Ok(())
}
