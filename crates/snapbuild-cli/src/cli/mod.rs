//! Command-line interface definition.
//!
//! - `snapbuild build` - bundle the Snap once
//! - `snapbuild watch` - bundle, then rebuild on every source change

mod commands;
pub mod enums;
mod validation;

use clap::Parser;

pub use commands::{BuildArgs, Command, WatchArgs};
pub use enums::*;
pub use validation::{parse_dependency, parse_outfile_name};

/// snapbuild - bundle a Snap into a single SES-ready file
#[derive(Parser, Debug)]
#[command(
    name = "snapbuild",
    version,
    about = "Bundle a Snap into a single SES-ready file",
    long_about = "snapbuild bundles a Snap's JavaScript or TypeScript sources into one\n\
                  UMD file exposed as `snap`, transpiles them for the supported browsers,\n\
                  and rewrites the output so it evaluates under SES."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}
