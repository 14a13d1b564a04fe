use anyhow::Result;
use structopt::StructOpt;

use compdb_utils::{
    absolutize::make_include_paths_absolute,
    cli::{or_current_dir, AbsPathsOptions},
    init_logger,
};

fn main() -> Result<()> {
    init_logger();
    let options = AbsPathsOptions::from_args();

    for path in or_current_dir(&options.paths) {
        make_include_paths_absolute(&path)?;
    }

    Ok(())
}
