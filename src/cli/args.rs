use clap::{Args, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct NewtonBasinsArgs {
    #[command(subcommand)]
    pub command: Option<CommandsEnum>,

    /// Log progress and timing to stderr.
    #[clap(long, short, global = true)]
    pub verbose: bool,
}

impl NewtonBasinsArgs {
    /// Level for the stderr log subscriber; `None` leaves logging off.
    pub fn log_level(&self) -> Option<LevelFilter> {
        if self.verbose {
            Some(LevelFilter::DEBUG)
        } else {
            None
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CommandsEnum {
    /// Evaluate the whole lattice and summarize the per-root matrices.
    Evaluate(ParameterFilePath),
    /// Run Newton's method from a single starting point.
    Classify(ClassifyArgs),
}

#[derive(Debug, Args)]
pub struct ParameterFilePath {
    pub params_path: String,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    pub params_path: String,

    /// Real part of the starting point.
    #[clap(allow_hyphen_values = true, allow_negative_numbers = true)]
    pub re: f64,

    /// Imaginary part of the starting point.
    #[clap(allow_hyphen_values = true, allow_negative_numbers = true)]
    pub im: f64,
}
