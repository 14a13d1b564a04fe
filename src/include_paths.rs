use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::compilation_database::{
    command_line::parse_command_line, load_database_in_directory, CompileCommandEntry,
};
use crate::paths::{join_normalized, relative_path};

/// Print the source directories and include directories referenced by
/// `<db_directory>/compile_commands.json`, one per line, relative to
/// `db_directory`. A database that can't be opened is skipped.
pub fn print_include_paths<W: Write>(mut writer: W, db_directory: &Path) -> Result<()> {
    let compile_commands = match load_database_in_directory(db_directory)? {
        Some(compile_commands) => compile_commands,
        None => return Ok(()),
    };

    for entry in &compile_commands {
        for path in entry_include_paths(entry, db_directory)? {
            writeln!(&mut writer, "{}", path.display())?;
        }
    }

    Ok(())
}

/// The directory of the entry's source file, followed by its `-I` paths, all
/// relative to `db_directory`.
pub fn entry_include_paths(entry: &CompileCommandEntry, db_directory: &Path) -> Result<Vec<PathBuf>> {
    let directory = if entry.directory.is_absolute() {
        relative_path(&entry.directory, db_directory)?
    } else {
        entry.directory.clone()
    };

    let file_directory = entry.file.parent().unwrap_or(&entry.file);
    let mut include_paths = vec![relative_path_with_prefix(
        file_directory,
        &directory,
        db_directory,
    )?];
    for include_path in parse_command_line(entry.command_tokens()).include_paths {
        include_paths.push(relative_path_with_prefix(
            Path::new(&include_path),
            &directory,
            db_directory,
        )?);
    }

    Ok(include_paths)
}

fn relative_path_with_prefix(path: &Path, prefix: &Path, db_directory: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        relative_path(path, db_directory)
    } else {
        Ok(join_normalized(prefix, path))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::compilation_database::{read_compile_database, DATABASE_FILE_NAME};

    #[test]
    fn entry_include_paths_relative_directory() {
        let entry = read_compile_database(
            r#"[{"directory": "build", "file": "../src/a.c",
                 "command": "cc -I../inc -Igen -DX -c ../src/a.c"}]"#
                .as_bytes(),
        )
        .expect("read_compile_database failed")
        .remove(0);

        assert_eq!(
            entry_include_paths(&entry, Path::new("/proj")).expect("entry_include_paths failed"),
            vec![
                PathBuf::from("src"),
                PathBuf::from("inc"),
                PathBuf::from("build/gen")
            ]
        );
    }

    #[test]
    fn entry_include_paths_absolute_paths() {
        let entry = read_compile_database(
            r#"[{"directory": "/proj/build", "file": "/proj/src/a.c",
                 "command": "cc -I /proj/third_party/include -I /usr/include -c /proj/src/a.c"}]"#
                .as_bytes(),
        )
        .expect("read_compile_database failed")
        .remove(0);

        assert_eq!(
            entry_include_paths(&entry, Path::new("/proj")).expect("entry_include_paths failed"),
            vec![
                PathBuf::from("src"),
                PathBuf::from("third_party/include"),
                PathBuf::from("../usr/include")
            ]
        );
    }

    #[test]
    fn entry_include_paths_file_in_directory() {
        let entry = read_compile_database(
            r#"[{"directory": "/proj/lib", "file": "a.c", "command": "cc -c a.c"}]"#.as_bytes(),
        )
        .expect("read_compile_database failed")
        .remove(0);

        assert_eq!(
            entry_include_paths(&entry, Path::new("/proj")).expect("entry_include_paths failed"),
            vec![PathBuf::from("lib")]
        );
    }

    #[test]
    fn print_include_paths_leaves_database_untouched() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let db_path = tmp_dir.path().join(DATABASE_FILE_NAME);
        let db_content = format!(
            r#"[
                {{"directory": "{0}/build", "file": "../src/a.c", "command": "cc -I../inc -c ../src/a.c"}},
                {{"directory": "{0}/build", "file": "../lib/b.c", "command": "cc -I {0}/ext/include -c ../lib/b.c"}}
            ]"#,
            tmp_dir.path().display()
        );
        fs::write(&db_path, &db_content).unwrap();

        let mut output = vec![];
        print_include_paths(&mut output, tmp_dir.path()).expect("print_include_paths failed");

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "src\ninc\nlib\next/include\n"
        );
        assert_eq!(fs::read_to_string(&db_path).unwrap(), db_content);
    }

    #[test]
    fn print_include_paths_missing_database() {
        let tmp_dir = tempfile::tempdir().unwrap();

        let mut output = vec![];
        print_include_paths(&mut output, tmp_dir.path()).expect("print_include_paths failed");
        assert!(output.is_empty());
    }
}
