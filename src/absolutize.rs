use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::compilation_database::{
    command_line::parse_command_line, load_database_in_directory, write_compile_database,
    CompileCommandEntry, DATABASE_FILE_NAME,
};
use crate::paths::{absolute_path, join_normalized};

/// Rewrite `<db_directory>/compile_commands.json` in place so that every
/// entry's `file`, `-I` paths and `-c` source file are absolute.
/// A database that can't be opened is skipped.
pub fn make_include_paths_absolute(db_directory: &Path) -> Result<()> {
    let mut compile_commands = match load_database_in_directory(db_directory)? {
        Some(compile_commands) => compile_commands,
        None => return Ok(()),
    };

    // Relative `directory` fields are relative to the database's location
    let db_directory_abs = absolute_path(db_directory)?;
    for entry in compile_commands.iter_mut() {
        absolutize_entry(entry, &db_directory_abs);
    }

    write_compile_database(&db_directory.join(DATABASE_FILE_NAME), &compile_commands)
}

pub fn absolutize_entry(entry: &mut CompileCommandEntry, db_directory: &Path) {
    let directory = join_normalized(db_directory, &entry.directory);
    entry.file = join_normalized(&directory, &entry.file);

    let parsed_cmd = parse_command_line(entry.command_tokens());
    let mut tokens = parsed_cmd.remaining_args;
    for include_path in &parsed_cmd.include_paths {
        tokens.push("-I".to_owned());
        tokens.push(path_to_string(join_normalized(&directory, Path::new(include_path))));
    }
    match parsed_cmd.source_file {
        Some(source_file) => {
            tokens.push("-c".to_owned());
            tokens.push(path_to_string(join_normalized(
                &directory,
                Path::new(&source_file),
            )));
        }
        None => log::warn!(
            "No source file argument in the command for '{}'",
            entry.file.display()
        ),
    }

    entry.set_command_tokens(tokens);
}

fn path_to_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::compilation_database::{parse_compile_database, read_compile_database};

    const DATABASE1: &str = r#"[
        {"directory": "/proj/build", "file": "../src/a.c", "command": "cc -I../inc -c ../src/a.c"}
    ]"#;

    fn single_entry(json: &str) -> CompileCommandEntry {
        read_compile_database(json.as_bytes())
            .expect("read_compile_database failed")
            .remove(0)
    }

    #[test]
    fn absolutize_entry_rewrites_paths() {
        let mut entry = single_entry(DATABASE1);
        absolutize_entry(&mut entry, Path::new("/proj/build"));

        assert_eq!(entry.file, PathBuf::from("/proj/src/a.c"));
        assert_eq!(entry.directory, PathBuf::from("/proj/build"));
        assert_eq!(
            entry.command.as_deref(),
            Some("cc -I /proj/inc -c /proj/src/a.c")
        );
    }

    #[test]
    fn absolutize_entry_keeps_include_order_and_other_args() {
        let mut entry = single_entry(
            r#"[{"directory": "/b", "file": "x.cc",
                 "command": "c++ -std=c++17 -Ia -I /usr/include -o x.o -I ./c/../d -c x.cc"}]"#,
        );
        absolutize_entry(&mut entry, Path::new("/"));

        assert_eq!(
            entry.command.as_deref(),
            Some("c++ -std=c++17 -o x.o -I /b/a -I /usr/include -I /b/d -c /b/x.cc")
        );
    }

    #[test]
    fn absolutize_entry_is_idempotent() {
        let mut once = single_entry(
            r#"[{"directory": "/b", "file": "x.cc", "command": "c++ -Ia -Ib -DX -c x.cc"}]"#,
        );
        absolutize_entry(&mut once, Path::new("/"));
        let mut twice = once.clone();
        absolutize_entry(&mut twice, Path::new("/"));

        assert_eq!(once, twice);
    }

    #[test]
    fn absolutize_entry_relative_directory() {
        let mut entry = single_entry(
            r#"[{"directory": "build", "file": "../a.c", "command": "cc -I inc -c ../a.c"}]"#,
        );
        absolutize_entry(&mut entry, Path::new("/proj"));

        assert_eq!(entry.file, PathBuf::from("/proj/a.c"));
        assert_eq!(
            entry.command.as_deref(),
            Some("cc -I /proj/build/inc -c /proj/a.c")
        );
    }

    #[test]
    fn absolutize_entry_arguments() {
        let mut entry = single_entry(
            r#"[{"directory": "/b", "file": "x.c", "arguments": ["cc", "-I..", "-c", "x.c"]}]"#,
        );
        absolutize_entry(&mut entry, Path::new("/"));

        assert!(entry.command.is_none());
        assert_eq!(
            entry.arguments,
            Some(vec![
                "cc".to_string(),
                "-I".to_string(),
                "/".to_string(),
                "-c".to_string(),
                "/b/x.c".to_string()
            ])
        );
    }

    #[test]
    fn absolutize_entry_without_source_file() {
        let mut entry =
            single_entry(r#"[{"directory": "/b", "file": "x.c", "command": "cc -Iinc x.c"}]"#);
        absolutize_entry(&mut entry, Path::new("/"));

        assert_eq!(entry.command.as_deref(), Some("cc x.c -I /b/inc"));
    }

    #[test]
    fn make_include_paths_absolute_rewrites_file() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let db_path = tmp_dir.path().join(DATABASE_FILE_NAME);
        fs::write(&db_path, DATABASE1).unwrap();

        make_include_paths_absolute(tmp_dir.path()).expect("make_include_paths_absolute failed");

        let compile_commands =
            parse_compile_database(&db_path).expect("parse_compile_database failed");
        assert_eq!(compile_commands.len(), 1);
        assert_eq!(compile_commands[0].file, PathBuf::from("/proj/src/a.c"));
        assert_eq!(
            compile_commands[0].command.as_deref(),
            Some("cc -I /proj/inc -c /proj/src/a.c")
        );
    }

    #[test]
    fn make_include_paths_absolute_keeps_other_fields() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let db_path = tmp_dir.path().join(DATABASE_FILE_NAME);
        fs::write(
            &db_path,
            r#"[{"directory": "/b", "file": "x.c", "command": "cc -c x.c", "custom": "keep-me"}]"#,
        )
        .unwrap();

        make_include_paths_absolute(tmp_dir.path()).expect("make_include_paths_absolute failed");

        let compile_commands =
            parse_compile_database(&db_path).expect("parse_compile_database failed");
        assert_eq!(compile_commands[0].command.as_deref(), Some("cc -c /b/x.c"));
        assert_eq!(compile_commands[0].extra["custom"], "keep-me");
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&db_path).unwrap()).unwrap();
        assert_eq!(written[0]["custom"], "keep-me");
    }

    #[test]
    fn make_include_paths_absolute_missing_database() {
        let tmp_dir = tempfile::tempdir().unwrap();

        assert!(make_include_paths_absolute(tmp_dir.path()).is_ok());
        assert!(!tmp_dir.path().join(DATABASE_FILE_NAME).exists());
    }

    #[test]
    fn make_include_paths_absolute_malformed_database() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let db_path = tmp_dir.path().join(DATABASE_FILE_NAME);
        fs::write(&db_path, "{").unwrap();

        assert!(make_include_paths_absolute(tmp_dir.path()).is_err());
        assert_eq!(fs::read_to_string(&db_path).unwrap(), "{");
    }
}
