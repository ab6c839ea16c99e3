//! lprof CLI entry point.

use lprof::cli::{self, Cli};
use lprof::Result;

fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Execute the pipeline
    cli::execute(cli)
}
