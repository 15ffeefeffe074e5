use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "exosky",
    author,
    version,
    about = "Browse exoplanets and view the stars around them",
    long_about = None
)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        help = "Config file (defaults to ~/.exosky/config.json)"
    )]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List planet names containing QUERY
    Search {
        #[arg(help = "Case-insensitive name fragment; lists every planet when omitted")]
        query: Option<String>,
    },
    /// Print a planet's parameters
    Info {
        #[arg(help = "Exact planet name, e.g. \"Kepler-22 b\"")]
        name: String,
    },
    /// Open the star-field viewer around a planet
    View(ViewArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ViewArgs {
    #[arg(help = "Planet name, shown in the view and used for the archive lookup")]
    pub name: String,

    #[arg(
        long,
        requires = "dec",
        allow_negative_numbers = true,
        help = "Right ascension in degrees (skips the archive lookup with --dec)"
    )]
    pub ra: Option<f64>,

    #[arg(
        long,
        requires = "ra",
        allow_negative_numbers = true,
        help = "Declination in degrees"
    )]
    pub dec: Option<f64>,

    #[arg(long, help = "Read stars from a CSV file instead of querying Gaia")]
    pub stars: Option<PathBuf>,
}

impl Cli {
    /// Log level implied by the flags; `RUST_LOG` still overrides it
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
