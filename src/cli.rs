use clap::{ArgAction, Parser};
use tracing::Level;

/// Counts lines of code under the current directory.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Exit right after the report instead of waiting for Enter
    #[arg(long)]
    pub no_pause: bool,

    /// Log diagnostics to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug)]
pub struct Options {
    pub pause: bool,
    pub log_level: Level,
}

pub fn build_options(args: &Args) -> Options {
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    Options {
        pause: !args.no_pause,
        log_level,
    }
}
