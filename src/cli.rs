//! CLI argument parsing for timetree

use crate::unit::TimeUnit;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "timetree")]
#[command(version)]
#[command(about = "Time a command as a tree of nested regions", long_about = None)]
pub struct Cli {
    /// Unit regions accumulate in (overrides the config file)
    #[arg(short = 'u', long = "unit", value_enum, value_name = "UNIT")]
    pub unit: Option<TimeUnit>,

    /// Run the command this many times (stops early on failure)
    #[arg(
        short = 'n',
        long = "repeat",
        value_name = "N",
        default_value = "1",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub repeat: u32,

    /// TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report only the top-level region, without its children
    #[arg(long = "flat")]
    pub flat: bool,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,

    /// Command to time (everything after --)
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}
