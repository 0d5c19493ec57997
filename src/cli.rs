use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tagstamp")]
#[command(version = "0.1.0")]
#[command(about = "Bulk-updates MP3/M4A tags from date-stamped filenames")]
pub struct Cli {
    /// Directory containing files named like SongTitle_2024-1122.mp3
    pub directory: PathBuf,

    /// Only print failures and the final summary
    #[arg(long = "quiet", short = 'q', default_value_t = false)]
    pub quiet: bool,

    /// Transcript format
    #[arg(long = "output", value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
