use clap::ValueEnum;

pub mod commands;

/// How listing commands render their output
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}
