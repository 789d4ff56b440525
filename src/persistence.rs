//! JSON files backing the library and to-do overlays.
//!
//! Saves write the whole list as pretty JSON. Loads parse strict JSON and,
//! when that fails, fall back to a line scanner that recovers records from
//! hand-edited or truncated files:
//! - a record opens on a `"path": "` / `"task": "` line;
//! - it closes on the matching `"title": "` / `"completed": ` line;
//! - any other line is skipped, and so is a closing line with nothing open.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::library::Ebook;
use crate::components::todolist::TodoTask;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read/write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize)]
struct LibraryFile {
    ebooks: Vec<Ebook>,
}

#[derive(Serialize, Deserialize)]
struct TodoFile {
    tasks: Vec<TodoTask>,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| PersistenceError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text + "\n").map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_text(path: &Path) -> Result<String, PersistenceError> {
    fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_library(path: impl AsRef<Path>, ebooks: &[Ebook]) -> Result<(), PersistenceError> {
    write_json(
        path.as_ref(),
        &LibraryFile {
            ebooks: ebooks.to_vec(),
        },
    )
}

pub fn load_library(path: impl AsRef<Path>) -> Result<Vec<Ebook>, PersistenceError> {
    let path = path.as_ref();
    let text = read_text(path)?;
    match serde_json::from_str::<LibraryFile>(&text) {
        Ok(file) => Ok(file.ebooks),
        Err(e) => {
            debug!("{} is not strict JSON ({}), scanning lines", path.display(), e);
            Ok(scan_library(&text))
        }
    }
}

pub fn save_todo_list(path: impl AsRef<Path>, tasks: &[TodoTask]) -> Result<(), PersistenceError> {
    write_json(
        path.as_ref(),
        &TodoFile {
            tasks: tasks.to_vec(),
        },
    )
}

pub fn load_todo_list(path: impl AsRef<Path>) -> Result<Vec<TodoTask>, PersistenceError> {
    let path = path.as_ref();
    let text = read_text(path)?;
    match serde_json::from_str::<TodoFile>(&text) {
        Ok(file) => Ok(file.tasks),
        Err(e) => {
            debug!("{} is not strict JSON ({}), scanning lines", path.display(), e);
            Ok(scan_todo_list(&text))
        }
    }
}

/// Decode `\" \\ \n \r \t`. Any other escaped character stands for itself.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// String value following `key` on `line`, up to the first unescaped quote.
fn string_after<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let start = line.find(key)? + key.len();
    let rest = &line[start..];
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(&rest[..i]),
            _ => {}
        }
    }
    Some(rest)
}

pub fn scan_library(text: &str) -> Vec<Ebook> {
    let mut ebooks = Vec::new();
    let mut open: Option<String> = None;
    for line in text.lines() {
        if let Some(raw) = string_after(line, "\"path\": \"") {
            open = Some(unescape(raw));
        }
        if let Some(raw) = string_after(line, "\"title\": \"") {
            match open.take() {
                Some(path) => ebooks.push(Ebook::new(path, unescape(raw))),
                None => debug!("skipping title without a path: {}", line.trim()),
            }
        }
    }
    ebooks
}

pub fn scan_todo_list(text: &str) -> Vec<TodoTask> {
    let mut tasks = Vec::new();
    let mut open: Option<String> = None;
    for line in text.lines() {
        if let Some(raw) = string_after(line, "\"task\": \"") {
            open = Some(unescape(raw));
        }
        const COMPLETED_KEY: &str = "\"completed\": ";
        if let Some(pos) = line.find(COMPLETED_KEY) {
            let completed = line[pos + COMPLETED_KEY.len()..].trim_start().starts_with("true");
            match open.take() {
                Some(task) => tasks.push(TodoTask { task, completed }),
                None => debug!("skipping completed flag without a task: {}", line.trim()),
            }
        }
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_decodes_known_escapes() {
        assert_eq!(unescape(r#"a\"b\\c\nd\te\rf"#), "a\"b\\c\nd\te\rf");
        assert_eq!(unescape(r"trailing\"), "trailing");
    }

    #[test]
    fn test_scan_library_pairs_path_and_title() {
        let text = r#"{
  "ebooks": [
    {
      "path": "books/a.pdf",
      "title": "The \"A\" Book"
    },
    {
      "title": "orphan"
    },
    {
      "path": "books/b.pdf",
      "title": "B"
    ,
"#;
        let books = scan_library(text);
        assert_eq!(
            books,
            vec![
                Ebook::new("books/a.pdf", "The \"A\" Book"),
                Ebook::new("books/b.pdf", "B"),
            ]
        );
    }

    #[test]
    fn test_scan_todo_reads_completed_flags() {
        let text = "\"task\": \"wash\\tdishes\",\n\"completed\": true\nnoise\n\"task\": \"B\",\n\"completed\": false";
        let tasks = scan_todo_list(text);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task, "wash\tdishes");
        assert!(tasks[0].completed);
        assert!(!tasks[1].completed);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_todo_list(dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }

    #[test]
    fn test_garbage_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "not json at all\n{{{").unwrap();
        assert!(load_library(&path).unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_parent_dirs_and_pretty_prints() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/library.json");
        save_library(&path, &[Ebook::new("x.pdf", "X")]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n      \"path\": \"x.pdf\",\n"));
        assert_eq!(load_library(&path).unwrap(), vec![Ebook::new("x.pdf", "X")]);
    }
}
