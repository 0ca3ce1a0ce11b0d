use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use deckgen::{GeneratorConfig, Pipeline, ReportContent};
use flexi_logger::Logger;
use log::{info, warn};

/// Generates the strategy-session charts, slide deck and handout.
///
/// Without a subcommand the whole pipeline runs: three SVG charts, the HTML
/// deck, the PDF handout when requested, then the deck opens in the default
/// browser.  Handout fonts are looked up in `DECKGEN_FONTS_DIR`.
#[derive(Parser)]
#[command(author, version, about = "Strategy deck generator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    options: Options,
}

#[derive(Args)]
struct Options {
    /// Directory receiving the generated files.
    #[arg(long, short = 'o', global = true)]
    output_dir: Option<PathBuf>,

    /// JSON file with the report content (see `dump-content`).
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    /// JSON file with generator settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Do not open the deck after writing it.
    #[arg(long, global = true)]
    no_open: bool,

    /// Also render the PDF handout.
    #[arg(long, global = true)]
    handout: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the charts, assemble the deck and open it (default).
    Generate,

    /// Render only the three SVG charts.
    Charts,

    /// Assemble only the HTML deck, referencing the configured chart files.
    Deck,

    /// Render only the PDF handout.
    Handout,

    /// Print the built-in report content as JSON.
    #[command(name = "dump-content", aliases = ["dump_content"])]
    DumpContent,
}

fn main() {
    let _logger = match Logger::try_with_env_or_str("info")
        .and_then(|logger| logger.log_to_stderr().start())
    {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err}");
            None
        }
    };

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let command = cli.command.unwrap_or(Commands::Generate);
    if let Commands::DumpContent = command {
        println!("{}", ReportContent::builtin().to_json()?);
        return Ok(());
    }

    let pipeline = Pipeline::new(load_config(&cli.options)?, load_content(&cli.options)?);
    match command {
        Commands::Generate => {
            let summary = pipeline.run()?;
            for artifact in summary.artifacts() {
                println!("{}", artifact.path().display());
            }
            if pipeline.config().open_viewer && !summary.launched() {
                warn!("open {} manually", summary.deck().path().display());
            }
        }
        Commands::Charts => {
            for artifact in pipeline.render_charts()? {
                println!("{}", artifact.path().display());
            }
        }
        Commands::Deck => {
            let deck = pipeline.assemble_deck(&pipeline.planned_charts())?;
            println!("{}", deck.path().display());
        }
        Commands::Handout => {
            let handout = pipeline.render_handout()?;
            println!("{}", handout.path().display());
        }
        Commands::DumpContent => {}
    }
    Ok(())
}

fn load_config(options: &Options) -> deckgen::Result<GeneratorConfig> {
    let mut config = match &options.config {
        Some(path) => {
            info!("loading settings from {}", path.display());
            GeneratorConfig::from_json_file(path)?
        }
        None => GeneratorConfig::default(),
    };
    if let Some(dir) = &options.output_dir {
        config.output_dir = dir.clone();
    }
    if options.no_open {
        config.open_viewer = false;
    }
    if options.handout {
        config.handout = true;
    }
    Ok(config)
}

fn load_content(options: &Options) -> deckgen::Result<ReportContent> {
    match &options.content {
        Some(path) => {
            info!("loading content from {}", path.display());
            ReportContent::from_json_file(path)
        }
        None => Ok(ReportContent::builtin()),
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_generate() {
        let cli = Cli::try_parse_from(["deckgen"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.options.no_open);
    }

    #[test]
    fn flags_override_file_settings() {
        let cli =
            Cli::try_parse_from(["deckgen", "charts", "--output-dir", "out", "--no-open", "--handout"])
                .unwrap();
        assert!(matches!(cli.command, Some(Commands::Charts)));
        let config = load_config(&cli.options).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(!config.open_viewer);
        assert!(config.handout);
    }
}
