use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::compilation_database::{
    index_by_file, parse_compile_database, CompilationDatabase, CompileCommandEntry,
    CompileCommandsMap,
};
use crate::header_entries::{generate_header_compile_commands, HeaderEntryConfig};

/// Literal substring replacement, parsed from `SRC_PATH:DST_PATH`.
/// `\:` and `\\` stand for a literal colon and backslash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSubstitution {
    pub src: String,
    pub dst: String,
}

impl FromStr for PathSubstitution {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = vec![];
        let mut current = String::new();
        let mut char_it = s.chars();
        while let Some(c) = char_it.next() {
            match c {
                '\\' => match char_it.next() {
                    Some(escaped @ (':' | '\\')) => current.push(escaped),
                    Some(other) => {
                        current.push('\\');
                        current.push(other);
                    }
                    None => current.push('\\'),
                },
                ':' => parts.push(std::mem::take(&mut current)),
                c => current.push(c),
            }
        }
        parts.push(current);

        match <[String; 2]>::try_from(parts) {
            Ok([src, _]) if src.is_empty() => {
                Err(anyhow!("Empty source path in substitution '{}'", s))
            }
            Ok([src, dst]) => Ok(Self { src, dst }),
            Err(_) => Err(anyhow!(
                "Invalid path substitution '{}', expected SRC_PATH:DST_PATH",
                s
            )),
        }
    }
}

impl PathSubstitution {
    pub fn apply(&self, s: &str) -> String {
        s.replace(&self.src, &self.dst)
    }

    fn apply_to_path(&self, path: &Path) -> PathBuf {
        PathBuf::from(self.apply(&path.to_string_lossy()))
    }

    /// Substitute in every string field of `entry`
    pub fn apply_to_entry(&self, entry: &mut CompileCommandEntry) {
        entry.directory = self.apply_to_path(&entry.directory);
        entry.file = self.apply_to_path(&entry.file);
        if let Some(command) = entry.command.as_mut() {
            *command = self.apply(command);
        }
        if let Some(arguments) = entry.arguments.as_mut() {
            for argument in arguments.iter_mut() {
                *argument = self.apply(argument);
            }
        }
        if let Some(output) = entry.output.as_mut() {
            *output = self.apply(output);
        }
        for value in entry.extra.values_mut() {
            self.apply_to_value(value);
        }
    }

    fn apply_to_value(&self, value: &mut Value) {
        match value {
            Value::String(s) => *s = self.apply(s),
            Value::Array(values) => values.iter_mut().for_each(|v| self.apply_to_value(v)),
            Value::Object(map) => map.values_mut().for_each(|v| self.apply_to_value(v)),
            _ => {}
        }
    }
}

/// Merge `databases` into one, in order: substitutions are applied first, then
/// entries are keyed by `file` (the last one wins), then generated header
/// entries (if any) override existing ones.
pub fn merge_compile_commands(
    databases: Vec<CompilationDatabase>,
    substitutions: &[PathSubstitution],
    header_config: Option<&HeaderEntryConfig>,
) -> Result<CompileCommandsMap> {
    let mut compile_commands: CompilationDatabase = databases.into_iter().flatten().collect();
    for substitution in substitutions {
        log::debug!(
            "Substituting '{}' with '{}'",
            substitution.src,
            substitution.dst
        );
        for entry in compile_commands.iter_mut() {
            substitution.apply_to_entry(entry);
        }
    }

    let mut compile_commands = index_by_file(compile_commands);
    if let Some(header_config) = header_config {
        let header_compile_commands =
            generate_header_compile_commands(header_config, &compile_commands)?;
        log::debug!(
            "Generated {} header entries",
            header_compile_commands.len()
        );
        for entry in header_compile_commands {
            compile_commands.insert(entry.file.clone(), entry);
        }
    }

    Ok(compile_commands)
}

pub fn merge_compile_database_files(
    db_file_paths: &[PathBuf],
    substitutions: &[PathSubstitution],
    header_config: Option<&HeaderEntryConfig>,
) -> Result<CompileCommandsMap> {
    let databases = db_file_paths
        .iter()
        .map(|db_file_path| parse_compile_database(db_file_path))
        .collect::<Result<Vec<_>>>()?;

    merge_compile_commands(databases, substitutions, header_config)
}
