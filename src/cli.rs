use std::path::PathBuf;

use structopt::StructOpt;

use crate::header_entries::HeaderEntryConfig;
use crate::merge::PathSubstitution;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "compdb-abspaths",
    about = "Make file, include and source paths absolute in compilation databases (in place)"
)]
pub struct AbsPathsOptions {
    /// Directories containing a `compile_commands.json` file. Defaults to the
    /// current directory.
    #[structopt(parse(from_os_str))]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "compdb-ipaths",
    about = "Print the source and include directories referenced by compilation databases"
)]
pub struct IncludePathsOptions {
    /// Directories containing a `compile_commands.json` file. Defaults to the
    /// current directory.
    #[structopt(parse(from_os_str))]
    pub paths: Vec<PathBuf>,
}

/// Options shared by the tools that generate header entries
#[derive(Debug, StructOpt)]
pub struct HeaderEntryOptions {
    /// Use a custom build directory instead of `$PWD/build`
    #[structopt(
        parse(from_os_str),
        short,
        long,
        value_name = "PATH",
        default_value = "./build"
    )]
    pub build_dir: PathBuf,

    /// Generate entries for non-standalone header files as well
    #[structopt(short = "i", long)]
    pub generate_non_standalone_entries: bool,

    /// Use relative paths instead of absolute ones
    #[structopt(short = "r", long)]
    pub use_relative_paths: bool,
}

impl HeaderEntryOptions {
    pub fn to_config(&self, base_src_file: PathBuf, src_dirs: &[PathBuf]) -> HeaderEntryConfig {
        HeaderEntryConfig {
            build_dir: self.build_dir.clone(),
            base_src_file,
            src_dirs: or_current_dir(src_dirs),
            generate_non_standalone_entries: self.generate_non_standalone_entries,
            use_relative_paths: self.use_relative_paths,
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "compdb-headers",
    about = "Generate a compilation database on stdout containing entries for standalone C/C++ \
             headers (i.e. headers without a corresponding implementation file) based on an \
             entry from an existing compilation database"
)]
pub struct HeadersOptions {
    #[structopt(flatten)]
    pub header: HeaderEntryOptions,

    /// Use a custom reference `compile_commands.json` file instead of
    /// `$PWD/compile_commands.json`
    #[structopt(
        parse(from_os_str),
        short = "c",
        long,
        value_name = "PATH",
        default_value = "./compile_commands.json"
    )]
    pub compile_commands_file: PathBuf,

    /// Source file whose build command line to reuse for header entries
    #[structopt(parse(from_os_str))]
    pub base_src_file: PathBuf,

    /// Source directories to scan for header files. Defaults to the current
    /// directory.
    #[structopt(parse(from_os_str))]
    pub src_dirs: Vec<PathBuf>,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "compdb-merge",
    about = "Merge several compilation databases together, possibly substituting paths or \
             adding entries for standalone headers"
)]
pub struct MergeOptions {
    #[structopt(flatten)]
    pub header: HeaderEntryOptions,

    /// Source file whose build command line to reuse for header entries.
    /// Header entries are only generated when this is set.
    #[structopt(parse(from_os_str), short = "B", long, value_name = "PATH")]
    pub base_src_file: Option<PathBuf>,

    /// Source directories to scan for header files. Defaults to the current
    /// directory.
    #[structopt(parse(from_os_str), short, long = "src-dir", value_name = "PATH")]
    pub src_dirs: Vec<PathBuf>,

    /// Substitute SRC_PATH with DST_PATH in compilation database entries.
    /// `\:` and `\\` stand for a literal colon and backslash. SRC_PATH can't
    /// be empty.
    #[structopt(short = "S", long, value_name = "SRC_PATH:DST_PATH")]
    pub subst_path: Vec<PathSubstitution>,

    /// Paths to the `compile_commands.json` files to merge
    #[structopt(parse(from_os_str), required = true)]
    pub compile_commands_files: Vec<PathBuf>,
}

/// `paths`, or the current directory if there's none
pub fn or_current_dir(paths: &[PathBuf]) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths.to_vec()
    }
}
