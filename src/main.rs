use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use protmap::algorithm::{protalign, transeq};

#[derive(Parser)]
#[command(name = "protmap")]
#[command(version = "0.1.0")]
#[command(about = "Map protein evidence onto a genome", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Six-frame search, windowed spliced alignment and GFF3 output
    Align(protalign::AlignArgs),

    /// Six-frame translation only
    Transeq(transeq::TranseqArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Commands::Align(args) => args.verbose,
            Commands::Transeq(args) => args.verbose,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.command.verbose() { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Align(args) => {
            protalign::run(args)?;
        }
        Commands::Transeq(args) => {
            transeq::run(args)?;
        }
    }
    Ok(())
}
