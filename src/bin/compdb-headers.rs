use std::io;

use anyhow::Result;
use structopt::StructOpt;

use compdb_utils::{
    cli::HeadersOptions,
    compilation_database::{dump_compile_database, index_by_file, parse_compile_database},
    header_entries::generate_header_compile_commands,
    init_logger,
};

fn main() -> Result<()> {
    init_logger();
    let options = HeadersOptions::from_args();

    let compile_commands = index_by_file(parse_compile_database(&options.compile_commands_file)?);
    let config = options
        .header
        .to_config(options.base_src_file.clone(), &options.src_dirs);
    let header_compile_commands = generate_header_compile_commands(&config, &compile_commands)?;

    dump_compile_database(io::stdout().lock(), &header_compile_commands)
}
