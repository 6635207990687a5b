use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tm_translator::{render, translate, unreachable_states, Format, MachineLoader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The two-tape machine description to translate (`.json` files are read as JSON)
    input: PathBuf,

    /// Where to write the one-tape machine; standard output when omitted
    output: Option<PathBuf>,

    /// Only report errors
    #[clap(short, long)]
    quiet: bool,

    /// Print debug diagnostics
    #[clap(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// The format of the translated machine
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Format::Text,
            OutputFormat::Json => Format::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let machine = MachineLoader::load_machine(&cli.input)
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    debug!(
        num_tapes = machine.num_tapes(),
        states = machine.set_of_states().len(),
        "loaded machine"
    );

    for state in unreachable_states(&machine) {
        warn!(%state, "state is unreachable from the initial state");
    }

    let translated = translate(&machine)
        .with_context(|| format!("Failed to translate {}", cli.input.display()))?;
    let rendered = render(&translated, cli.format.into())?;

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                output = %path.display(),
                transitions = translated.transitions().len(),
                "wrote one-tape machine"
            );
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
