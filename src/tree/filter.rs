//! Path filtering for scanning

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ConfigError;

use super::config::ScanConfig;

/// Decides which directories are walked, which files are listed, and which
/// listed files are counted as code.
///
/// Built once per scan from a `ScanConfig`; regexes are compiled up front so
/// a bad pattern is reported before anything is read.
#[derive(Debug, Clone)]
pub struct PathFilter {
    root: PathBuf,
    include_hidden: bool,
    excluded_dirs: Vec<String>,
    exclude_patterns: Vec<Regex>,
    code_extensions: BTreeSet<String>,
}

impl PathFilter {
    pub fn new(root: &Path, config: &ScanConfig) -> Result<Self, ConfigError> {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| {
                Regex::new(p).map_err(|source| ConfigError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let excluded_dirs = config
            .excluded_dirs
            .iter()
            .map(|d| normalize_dir_entry(d))
            .filter(|d| !d.is_empty())
            .collect();

        Ok(Self {
            root: root.to_path_buf(),
            include_hidden: config.include_hidden,
            excluded_dirs,
            exclude_patterns,
            code_extensions: config.code_extensions.clone(),
        })
    }

    /// True if a directory and everything below it should be left out.
    pub fn should_skip_directory(&self, path: &Path) -> bool {
        let name = entry_name(path);
        if self.is_hidden_excluded(&name) {
            return true;
        }

        let rel_path = self.relative_path(path);
        if self.matches_exclude_pattern(&rel_path, &name) {
            return true;
        }

        self.excluded_dirs.iter().any(|needle| {
            if needle.contains('/') {
                rel_path == *needle || rel_path.ends_with(&format!("/{}", needle))
            } else {
                name == *needle
            }
        })
    }

    /// True if a file should appear in the results at all.
    pub fn should_list_file(&self, path: &Path) -> bool {
        let name = entry_name(path);
        if self.is_hidden_excluded(&name) {
            return false;
        }
        !self.matches_exclude_pattern(&self.relative_path(path), &name)
    }

    /// True if the file's extension is one of the code extensions.
    pub fn is_counted_code_file(&self, path: &Path) -> bool {
        path.extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .is_some_and(|ext| ext.len() > 1 && self.code_extensions.contains(&ext))
    }

    fn is_hidden_excluded(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }

    fn matches_exclude_pattern(&self, rel_path: &str, name: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|re| re.is_match(rel_path) || re.is_match(name))
    }

    /// Path relative to the scan root with `/` separators.
    fn relative_path(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => path.to_string_lossy().replace('\\', "/"),
        }
    }
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn normalize_dir_entry(raw: &str) -> String {
    raw.trim().replace('\\', "/").trim_matches('/').to_string()
}
