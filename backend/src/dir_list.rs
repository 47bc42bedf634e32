use walkdir::WalkDir;
use std::path::{Path, PathBuf};

use crate::logger;

/// Lists files under the given directories having extension `ext`
/// (case insensitive), sorted by path. Unreadable entries are logged and skipped.
pub fn list_files_with_extension(dirs: &[PathBuf], ext: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();

    for dir in dirs {
        if !dir.is_dir() {
            logger::warn(&format!("Not a directory, skipping: {:?}", dir));
            continue;
        }

        for entry in WalkDir::new(dir).follow_links(true) {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && has_extension(entry.path(), ext) {
                        files.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => logger::warn(&format!("Can't read directory entry: {}", e)),
            }
        }
    }

    files.sort();
    files.dedup();
    files
}

pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// `MARBLELinks-LUK.json` → `LUK`: the part of the file stem after the last `-`.
pub fn book_code_from_filename(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let code = stem.rsplit('-').next()?;
    if code.is_empty() {
        None
    } else {
        Some(code.to_uppercase())
    }
}
