use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

/// File names a manually uploaded server archive is expected to carry.
pub const PREFERRED_NAMES: &[&str] = &[
    "bedrock-server.zip",
    "bedrock_server.zip",
    "minecraft-server.zip",
    "server.zip",
];

/// Keywords that mark an arbitrary `*.zip` as a likely server archive.
pub const NAME_KEYWORDS: &[&str] = &["bedrock", "server", "minecraft"];

/// Find a manually uploaded server archive.
///
/// Preferred names win, in order, across all search directories; after
/// that any zip whose name contains a keyword is accepted.
pub fn locate_archive(search_dirs: &[PathBuf]) -> Option<PathBuf> {
    for name in PREFERRED_NAMES {
        for dir in search_dirs {
            let candidate = dir.join(name);
            if candidate.is_file() {
                info!(path = %candidate.display(), "found server archive");
                return Some(candidate);
            }
        }
    }

    for (path, _) in list_archives(search_dirs) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if NAME_KEYWORDS.iter().any(|k| name.contains(k)) {
            info!(path = %path.display(), "found candidate server archive");
            return Some(path);
        }
    }

    None
}

/// All `*.zip` files in the search directories, with sizes in bytes.
pub fn list_archives(search_dirs: &[PathBuf]) -> Vec<(PathBuf, u64)> {
    let mut found = Vec::new();
    for dir in search_dirs {
        let Ok(entries) = fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("zip"))
                && let Ok(meta) = entry.metadata()
                && meta.is_file()
            {
                found.push((path, meta.len()));
            }
        }
    }
    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, bytes: &[u8]) {
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn preferred_name_wins_over_keyword_match() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("my-bedrock-build.zip"), b"x");
        touch(&tmp.path().join("bedrock-server.zip"), b"x");

        let found = locate_archive(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(found.file_name().unwrap(), "bedrock-server.zip");
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("Bedrock-1.21.zip"), b"x");

        let found = locate_archive(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(found.file_name().unwrap(), "Bedrock-1.21.zip");
    }

    #[test]
    fn unrelated_zips_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("photos.zip"), b"x");

        assert!(locate_archive(&[tmp.path().to_path_buf()]).is_none());
    }

    #[test]
    fn earlier_search_dir_wins() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        touch(&a.path().join("bedrock-server.zip"), b"a");
        touch(&b.path().join("bedrock-server.zip"), b"b");

        let found =
            locate_archive(&[a.path().to_path_buf(), b.path().to_path_buf()]).unwrap();
        assert!(found.starts_with(a.path()));
    }

    #[test]
    fn listing_reports_sizes() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("one.zip"), b"12345");
        touch(&tmp.path().join("not-a-zip.txt"), b"x");

        let listed = list_archives(&[tmp.path().to_path_buf()]);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].1, 5);
    }

    #[test]
    fn missing_dirs_are_skipped() {
        let listed = list_archives(&[PathBuf::from("/definitely/not/here")]);
        assert!(listed.is_empty());
    }
}
