use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `cflags: ...` / `asflags: ...` lines.
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "artflags")]
#[command(about = "ART runtime compiler flags and Makefile variables")]
pub struct Cli {
    /// Build config (JSON). Defaults apply when omitted.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override an environment key for this run. Repeatable; wins over the
    /// environment and the config file.
    #[arg(long = "set", global = true, value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Print the flags for one module.
    ///
    /// With neither --device nor --host, the module is treated as a device module.
    Flags {
        #[arg(long)]
        device: bool,

        #[arg(long)]
        host: bool,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Print the Makefile variables (base addresses, test lists, test case content).
    Makevars,

    /// Print the effective overrides, one KEY=VALUE per line.
    Env,
}
