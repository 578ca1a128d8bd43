//! File discovery and enumeration ordering

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::SortBy;
use crate::error::{Error, Result};

/// Enumerate the regular files under `root`, optionally recursing into
/// subdirectories.
///
/// Unreadable directory entries are logged and skipped rather than failing
/// the whole walk.
pub fn discover_files(root: &Path, include_subfolders: bool) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(Error::FileNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    walk(root, include_subfolders, &mut files)?;
    Ok(files)
}

fn walk(dir: &Path, recurse: bool, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            if recurse {
                walk(&path, recurse, out)?;
            }
        } else if path.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// Filter files by extension, then sort by the requested key.
///
/// Extensions match case-insensitively. `created` falls back to the
/// modification time on filesystems that do not record creation time.
pub fn filter_and_sort(
    files: Vec<PathBuf>,
    allowed_exts: &[String],
    sort_by: SortBy,
    desc: bool,
) -> Vec<PathBuf> {
    let mut pool: Vec<PathBuf> = files
        .into_iter()
        .filter(|p| has_allowed_extension(p, allowed_exts))
        .collect();

    match sort_by {
        SortBy::Name => pool.sort_by_key(|p| name_key(p)),
        SortBy::Created => pool.sort_by_key(|p| created_time(p)),
        SortBy::Modified => pool.sort_by_key(|p| modified_time(p)),
    }

    if desc {
        pool.reverse();
    }
    pool
}

fn has_allowed_extension(path: &Path, allowed: &[String]) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => format!(".{}", e.to_ascii_lowercase()),
        None => return false,
    };
    allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext))
}

fn name_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn created_time(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.created().or_else(|_| m.modified()))
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

fn modified_time(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap();
        path
    }

    #[test]
    fn test_discover_nonexistent_root() {
        let result = discover_files(Path::new("no/such/dir"), true);
        assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
    }

    #[test]
    fn test_discover_root_must_be_directory() {
        let tmp = TempDir::new().unwrap();
        let file = touch(tmp.path(), "plain.txt");
        let result = discover_files(&file, true);
        assert!(matches!(result.unwrap_err(), Error::NotADirectory(_)));
    }

    #[test]
    fn test_discover_respects_subfolder_flag() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "top.pdf");
        let sub = tmp.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        touch(&sub, "nested.pdf");

        let flat = discover_files(tmp.path(), false).unwrap();
        assert_eq!(flat.len(), 1);

        let deep = discover_files(tmp.path(), true).unwrap();
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn test_filter_and_sort_by_name_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        let b = touch(tmp.path(), "Banana.pdf");
        let a = touch(tmp.path(), "apple.pdf");
        let skipped = touch(tmp.path(), "notes.txt");

        let allowed = vec![".pdf".to_string()];
        let sorted = filter_and_sort(
            vec![b.clone(), a.clone(), skipped],
            &allowed,
            SortBy::Name,
            false,
        );

        assert_eq!(sorted, vec![a, b]);
    }

    #[test]
    fn test_filter_and_sort_descending() {
        let tmp = TempDir::new().unwrap();
        let one = touch(tmp.path(), "1.pdf");
        let two = touch(tmp.path(), "2.pdf");

        let allowed = vec![".pdf".to_string()];
        let sorted = filter_and_sort(vec![one.clone(), two.clone()], &allowed, SortBy::Name, true);

        assert_eq!(sorted, vec![two, one]);
    }

    #[test]
    fn test_filter_matches_extensions_case_insensitively() {
        let tmp = TempDir::new().unwrap();
        let upper = touch(tmp.path(), "SCAN.PDF");

        let allowed = vec![".pdf".to_string()];
        let sorted = filter_and_sort(vec![upper.clone()], &allowed, SortBy::Name, false);
        assert_eq!(sorted, vec![upper]);
    }
}
