//! File pattern resolution using glob

use anyhow::{Context, Result};
use glob::glob;
use std::path::{Path, PathBuf};

/// Resolve file patterns to actual file paths
///
/// An argument naming an existing file is taken literally, so file names
/// containing glob metacharacters still work.
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        if Path::new(pattern).is_file() {
            files.push(PathBuf::from(pattern));
            continue;
        }

        let before = files.len();
        let paths = glob(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))?;
        for path_result in paths {
            let path =
                path_result.with_context(|| format!("Error resolving pattern: {}", pattern))?;

            if path.is_file() {
                files.push(path);
            }
        }
        if files.len() == before {
            log::warn!("No files matched '{}'", pattern);
        }
    }

    if files.is_empty() {
        anyhow::bail!("No files found matching the provided patterns");
    }

    files.sort();
    files.dedup();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "x").unwrap();
        path
    }

    #[test]
    fn test_glob_and_literal_paths_dedup() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.txt");
        let b = touch(dir.path(), "b.txt");
        touch(dir.path(), "c.docx");

        let patterns = vec![
            dir.path().join("*.txt").display().to_string(),
            a.display().to_string(),
        ];
        assert_eq!(resolve_patterns(&patterns).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_literal_name_with_brackets() {
        let dir = TempDir::new().unwrap();
        let odd = touch(dir.path(), "report[1].txt");

        let patterns = vec![odd.display().to_string()];
        assert_eq!(resolve_patterns(&patterns).unwrap(), vec![odd]);
    }

    #[test]
    fn test_nothing_matched() {
        let dir = TempDir::new().unwrap();
        let patterns = vec![dir.path().join("*.pdf").display().to_string()];

        let err = resolve_patterns(&patterns).unwrap_err();
        assert!(err.to_string().contains("No files found"));
    }
}
