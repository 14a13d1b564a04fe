use std::io;

use anyhow::Result;
use structopt::StructOpt;

use compdb_utils::{
    cli::MergeOptions, compilation_database::dump_compile_database, init_logger,
    merge::merge_compile_database_files,
};

fn main() -> Result<()> {
    init_logger();
    let options = MergeOptions::from_args();

    let header_config = options
        .base_src_file
        .clone()
        .map(|base_src_file| options.header.to_config(base_src_file, &options.src_dirs));
    let compile_commands = merge_compile_database_files(
        &options.compile_commands_files,
        &options.subst_path,
        header_config.as_ref(),
    )?;

    dump_compile_database(io::stdout().lock(), compile_commands.values())
}
