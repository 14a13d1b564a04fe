pub mod command_line;

use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::paths::join_normalized;

pub const DATABASE_FILE_NAME: &str = "compile_commands.json";

/// One translation unit of a compilation database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommandEntry {
    /// Working directory of the compilation
    pub directory: PathBuf,
    /// Compiler invocation, as a single whitespace-separated string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Main source file, absolute or relative to `directory`
    pub file: PathBuf,
    /// Compiler invocation, as a list of arguments (alternative to `command`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Any other field, kept as is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CompileCommandEntry {
    /// Absolute (if `directory` is) and normalized path to `file`
    pub fn resolved_file(&self) -> PathBuf {
        join_normalized(&self.directory, &self.file)
    }

    /// The compiler invocation as a single string, whichever way it's stored.
    pub fn command_line(&self) -> Option<String> {
        match (&self.command, &self.arguments) {
            (Some(command), _) => Some(command.clone()),
            (None, Some(arguments)) => Some(arguments.join(" ")),
            (None, None) => None,
        }
    }

    /// The compiler invocation, split into arguments.
    pub fn command_tokens(&self) -> Vec<String> {
        match (&self.command, &self.arguments) {
            (Some(command), _) => command_line::split_command_line(command),
            (None, Some(arguments)) => arguments.clone(),
            (None, None) => vec![],
        }
    }

    /// Store `tokens` back, in the same representation the entry was read with.
    pub fn set_command_tokens(&mut self, tokens: Vec<String>) {
        if self.command.is_none() && self.arguments.is_some() {
            self.arguments = Some(tokens);
        } else {
            self.command = Some(tokens.join(" "));
        }
    }
}

pub type CompilationDatabase = Vec<CompileCommandEntry>;

/// Compilation database indexed by the `file` field. Keeps the position of a
/// key's first insertion and the value of its last one.
pub type CompileCommandsMap = IndexMap<PathBuf, CompileCommandEntry>;

pub fn index_by_file<I>(entries: I) -> CompileCommandsMap
where
    I: IntoIterator<Item = CompileCommandEntry>,
{
    let mut compile_commands = CompileCommandsMap::new();
    for entry in entries {
        compile_commands.insert(entry.file.clone(), entry);
    }

    compile_commands
}

pub fn read_compile_database<R: Read>(mut reader: R) -> Result<CompilationDatabase> {
    let mut db_data = vec![];
    reader.read_to_end(&mut db_data)?;

    Ok(serde_json::from_slice(&db_data)?)
}

pub fn parse_compile_database(db_file_path: &Path) -> Result<CompilationDatabase> {
    log::debug!("Loading '{}'", db_file_path.display());
    let db_file = File::open(db_file_path)
        .with_context(|| format!("Failed to open '{}'", db_file_path.display()))?;

    read_compile_database(db_file)
        .with_context(|| format!("Failed to parse '{}'", db_file_path.display()))
}

/// Load the `compile_commands.json` file found in `directory`. A file that
/// can't be opened is reported and yields `None`, a file that can't be parsed
/// is an error.
pub fn load_database_in_directory(directory: &Path) -> Result<Option<CompilationDatabase>> {
    let db_file_path = directory.join(DATABASE_FILE_NAME);
    log::debug!("Loading '{}'", db_file_path.display());
    match File::open(&db_file_path) {
        Ok(db_file) => Ok(Some(read_compile_database(db_file).with_context(|| {
            format!("Failed to parse '{}'", db_file_path.display())
        })?)),
        Err(e) => {
            log::error!("file {} does not exist ({})", db_file_path.display(), e);
            Ok(None)
        }
    }
}

pub fn dump_compile_database<'a, W, I>(writer: W, entries: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a CompileCommandEntry>,
{
    let entries: Vec<&CompileCommandEntry> = entries.into_iter().collect();
    serde_json::to_writer(writer, &entries)?;

    Ok(())
}

/// Replace the database file at `db_file_path` with `entries`. The content
/// goes to a temporary file in the same directory first, so a failed write
/// leaves the original untouched.
pub fn write_compile_database(db_file_path: &Path, entries: &[CompileCommandEntry]) -> Result<()> {
    log::debug!("Writing '{}'", db_file_path.display());
    let parent_dir = match db_file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp_file = NamedTempFile::new_in(parent_dir)?;
    dump_compile_database(&mut tmp_file, entries)?;
    tmp_file.flush()?;
    tmp_file
        .persist(db_file_path)
        .map_err(|e| anyhow!("Failed to write '{}': {}", db_file_path.display(), e))?;

    Ok(())
}
