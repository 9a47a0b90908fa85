//! # artflags
//!
//! Print ART runtime compiler flags and Makefile variables.
//!
//! ## Usage
//!
//! ```bash
//! artflags flags --device              # cflags/asflags for a device module
//! artflags flags --host --format json  # same, as JSON
//! artflags makevars -c build.json      # LIBART_IMG_*, ART_TEST_LIST_*, ART_TESTCASES_CONTENT
//! artflags env --set ART_USE_READ_BARRIER=true
//! ```

use anyhow::Result;
use clap::Parser;

mod app;
mod cli;
mod logger;

fn main() -> Result<()> {
    let cli = crate::cli::Cli::parse();
    logger::init(logger::level_for(cli.verbose));
    crate::app::run(cli)
}
