use std::path::PathBuf;

use clap::Parser;

/// Veil: an OpenGL frame renderer with a separable Gaussian blur.
#[derive(Parser, Debug)]
#[command(name = "veil", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter override, e.g. `veil=debug` or `info`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub dump_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
