use clap::{Parser, Subcommand};

use self::{export_d3::ExportD3Arg, histogram::HistogramArg, prepare::PrepareArg};

mod export_d3;
mod histogram;
mod prepare;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Build a balanced, normalized train/test split from user attributes
    Prepare(#[clap(flatten)] PrepareArg),
    /// Print a histogram of a processed user attribute
    Histogram(#[clap(flatten)] HistogramArg),
    /// Export the friendship graph for a D3 force-directed layout
    #[command(name = "export-d3")]
    ExportD3(#[clap(flatten)] ExportD3Arg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Prepare(arg) => prepare::run(&arg)?,
        Mode::Histogram(arg) => histogram::run(&arg)?,
        Mode::ExportD3(arg) => export_d3::run(&arg)?,
    }
    Ok(())
}
