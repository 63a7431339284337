use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "ayaview",
    version,
    about = "Step through verse recitations with their images, resuming where you left off.",
    long_about = None
)]
pub struct Cli {
    /// Print the stored position (creating it if absent) and exit
    #[clap(short, long)]
    pub position: bool,

    /// Dump the verse catalog and exit
    #[clap(short, long)]
    pub dump: bool,

    /// Use a specific configuration file
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verse database (overrides the configuration)
    #[clap(long, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Directory holding the audio and image files (overrides the configuration)
    #[clap(long, value_name = "DIR")]
    pub media_root: Option<PathBuf>,

    /// Write log lines to this file
    #[clap(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug output
    #[clap(long)]
    pub debug: bool,
}
