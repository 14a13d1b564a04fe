use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

use crate::compilation_database::{CompileCommandEntry, CompileCommandsMap};
use crate::paths::absolute_path;

/// Extensions of the files we generate entries for
pub const HEADER_EXTENSIONS: &[&str] = &["h", "hpp", "hxx", "hh", "h++", "hp"];
/// Extensions of implementation files, by order of priority
pub const IMPLEMENTATION_EXTENSIONS: &[&str] = &["c", "cpp", "cxx", "cc", "c++", "C"];

/// Parameters of the header entry generation
#[derive(Debug, Clone)]
pub struct HeaderEntryConfig {
    /// `directory` of the generated entries
    pub build_dir: PathBuf,
    /// Source file whose command line is used for standalone headers
    pub base_src_file: PathBuf,
    /// Directories scanned (recursively) for header files
    pub src_dirs: Vec<PathBuf>,
    /// Also generate entries for headers that have an implementation file
    pub generate_non_standalone_entries: bool,
    /// Keep paths as given instead of making them absolute
    pub use_relative_paths: bool,
}

/// Where the command line of a header's entry comes from
#[derive(Debug, PartialEq, Eq)]
enum HeaderTemplate {
    /// The header has an implementation file and should not get an entry
    Skip,
    /// Command line of the header's implementation file
    Implementation { file: PathBuf, command: String },
    /// Command line of the base source file
    Fallback,
}

/// Generate compilation database entries for the header files found in
/// `config.src_dirs`, using the entries of `compile_commands` as templates.
///
/// Entries are returned in directory traversal order. A header for which no
/// template command line can be found still gets an entry, without a
/// `command` field.
pub fn generate_header_compile_commands(
    config: &HeaderEntryConfig,
    compile_commands: &CompileCommandsMap,
) -> Result<Vec<CompileCommandEntry>> {
    let (build_dir, base_src_file) = if config.use_relative_paths {
        (config.build_dir.clone(), config.base_src_file.clone())
    } else {
        (
            absolute_path(&config.build_dir)?,
            absolute_path(&config.base_src_file)?,
        )
    };

    let fallback_command = get_command(compile_commands, &base_src_file);
    if fallback_command.is_none() {
        log::warn!(
            "'{}' not found in the compilation database, standalone headers won't have a command",
            base_src_file.display()
        );
    }

    let mut header_compile_commands = vec![];
    for src_dir in &config.src_dirs {
        // A `src_dir` that isn't a directory yields nothing
        for dir_entry in WalkDir::new(src_dir).min_depth(1) {
            let dir_entry = match dir_entry {
                Ok(dir_entry) => dir_entry,
                Err(e) => {
                    log::warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };
            let header_path = dir_entry.path();
            if header_path.is_dir() || !is_header(header_path) {
                continue;
            }
            // Paths are written out as JSON strings
            if header_path.to_str().is_none() {
                log::warn!(
                    "Skipping '{}', its path isn't valid UTF-8",
                    header_path.display()
                );
                continue;
            }

            let (template_path, command) = match find_template(
                header_path,
                compile_commands,
                config.generate_non_standalone_entries,
            ) {
                HeaderTemplate::Skip => continue,
                HeaderTemplate::Implementation { file, command } => (file, Some(command)),
                HeaderTemplate::Fallback => (base_src_file.clone(), fallback_command.clone()),
            };

            let (template_path, header_path) = if config.use_relative_paths {
                (template_path, header_path.to_path_buf())
            } else {
                (absolute_path(&template_path)?, absolute_path(header_path)?)
            };

            let command = {
                let template_path = template_path.to_string_lossy();
                let header_path = header_path.to_string_lossy();
                command.map(|command| command.replace(&*template_path, &header_path))
            };
            if command.is_none() {
                log::warn!("No command line for '{}'", header_path.display());
            }

            header_compile_commands.push(CompileCommandEntry {
                directory: build_dir.clone(),
                command,
                file: header_path,
                arguments: None,
                output: None,
                extra: Default::default(),
            });
        }
    }

    Ok(header_compile_commands)
}

fn is_header(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| HEADER_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn get_command(compile_commands: &CompileCommandsMap, file: &Path) -> Option<String> {
    compile_commands
        .get(file)
        .and_then(CompileCommandEntry::command_line)
}

fn find_template(
    header_path: &Path,
    compile_commands: &CompileCommandsMap,
    generate_non_standalone_entries: bool,
) -> HeaderTemplate {
    for impl_ext in IMPLEMENTATION_EXTENSIONS {
        let impl_path = header_path.with_extension(impl_ext);
        if !impl_path.exists() {
            continue;
        }

        if !generate_non_standalone_entries {
            log::debug!(
                "Skipping '{}', implemented in '{}'",
                header_path.display(),
                impl_path.display()
            );
            return HeaderTemplate::Skip;
        }
        if let Some(command) = get_command(compile_commands, &impl_path) {
            log::debug!(
                "Using the command of '{}' for '{}'",
                impl_path.display(),
                header_path.display()
            );
            return HeaderTemplate::Implementation {
                file: impl_path,
                command,
            };
        }
    }

    log::debug!("Using the base command for '{}'", header_path.display());
    HeaderTemplate::Fallback
}
