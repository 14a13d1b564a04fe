use std::io::{self, Write};

use anyhow::Result;
use structopt::StructOpt;

use compdb_utils::{
    cli::{or_current_dir, IncludePathsOptions},
    include_paths::print_include_paths,
    init_logger,
};

fn main() -> Result<()> {
    init_logger();
    let options = IncludePathsOptions::from_args();

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    for path in or_current_dir(&options.paths) {
        print_include_paths(&mut stdout, &path)?;
    }
    stdout.flush()?;

    Ok(())
}
