//! Scanner - builds the full metrics tree in memory

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::metrics::{DirectoryStats, FileStats, Metrics};

use super::config::ScanConfig;
use super::counter::count_file_metrics;
use super::filter::PathFilter;

/// Recursive, single-threaded directory scanner.
///
/// Unreadable directories are left out of the result and unreadable files
/// fall back to size-only metrics; neither stops the scan.
pub struct Scanner {
    config: ScanConfig,
    filter: PathFilter,
}

impl Scanner {
    /// Validate the configuration and prepare a scanner rooted at `root`.
    pub fn new(root: &Path, config: ScanConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let filter = PathFilter::new(root, &config)?;
        Ok(Self { config, filter })
    }

    /// Scan a directory. `None` means it could not be listed or was pruned
    /// as empty.
    pub fn scan(&self, path: &Path) -> Option<DirectoryStats> {
        let entries = match fs::read_dir(path) {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("skipping {}: {}", path.display(), e);
                return None;
            }
        };

        let mut subdirs: Vec<PathBuf> = Vec::new();
        let mut files: Vec<FileStats> = Vec::new();

        for entry in entries.filter_map(|e| e.ok()) {
            // Skip symlinks to prevent infinite loops and double counting
            let file_type = match entry.file_type() {
                Ok(t) if !t.is_symlink() => t,
                _ => continue,
            };
            let entry_path = entry.path();

            if file_type.is_dir() {
                if self.filter.should_skip_directory(&entry_path) {
                    tracing::trace!("excluded directory {}", entry_path.display());
                    continue;
                }
                subdirs.push(entry_path);
            } else if file_type.is_file() {
                if !self.filter.should_list_file(&entry_path) {
                    continue;
                }
                files.push(self.file_stats(entry_path, &entry));
            }
        }

        subdirs.sort_by_cached_key(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default()
        });
        let children: Vec<DirectoryStats> = subdirs
            .iter()
            .filter_map(|subdir| self.scan(subdir))
            .collect();

        let node = DirectoryStats::new(path.to_path_buf(), children, files);
        if node.is_prunable() && !self.config.show_all_dirs {
            return None;
        }
        Some(node)
    }

    fn file_stats(&self, path: PathBuf, entry: &fs::DirEntry) -> FileStats {
        let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let counted = self.filter.is_counted_code_file(&path);
        let metrics = if counted {
            count_file_metrics(
                &path,
                self.config.chars_per_token,
                self.config.include_blank_lines,
                size_bytes,
            )
        } else {
            Metrics::size_only(size_bytes)
        };
        FileStats {
            path,
            counted,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestDir;

    fn scan(dir: &TestDir, config: ScanConfig) -> Option<DirectoryStats> {
        Scanner::new(dir.path(), config).unwrap().scan(dir.path())
    }

    fn child<'a>(node: &'a DirectoryStats, name: &str) -> &'a DirectoryStats {
        node.children
            .iter()
            .find(|c| c.name() == name)
            .unwrap_or_else(|| panic!("no child directory {}", name))
    }

    /// 10 lines of 19 chars plus newline: 200 chars.
    fn ten_line_file() -> String {
        format!("{}\n", "a".repeat(19)).repeat(10)
    }

    /// 5 lines of 19 chars plus newline: 100 chars.
    fn five_line_file() -> String {
        format!("{}\n", "b".repeat(19)).repeat(5)
    }

    #[test]
    fn test_reference_scenario() {
        let dir = TestDir::new();
        dir.add_file("a.py", &ten_line_file());
        dir.add_file("sub/b.txt", &"x".repeat(50));
        dir.add_file("sub/c.py", &five_line_file());

        let root = scan(&dir, ScanConfig::default()).unwrap();
        assert_eq!(root.own_metrics, Metrics::new(10, 50, 200));

        let sub = child(&root, "sub");
        assert_eq!(sub.total_metrics, Metrics::new(5, 25, 150));
        assert_eq!(root.total_metrics.lines, 15);
        assert_eq!(root.total_metrics.tokens, 75);
        assert_eq!(root.total_metrics.size_bytes, 350);
    }

    #[test]
    fn test_uncounted_file_has_size_only() {
        let dir = TestDir::new();
        dir.add_file("notes.txt", "hello\nworld\n");

        let root = scan(&dir, ScanConfig::default()).unwrap();
        let f = &root.files[0];
        assert!(!f.counted);
        assert_eq!(f.metrics, Metrics::size_only(12));
    }

    #[test]
    fn test_excluded_directory_absent() {
        let dir = TestDir::new();
        dir.add_file("a.py", &ten_line_file());
        dir.add_file("sub/c.py", &five_line_file());

        let config = ScanConfig::default().with_excluded_dirs(["sub"]);
        let root = scan(&dir, config).unwrap();
        assert!(root.children.is_empty());
        assert_eq!(root.total_metrics, Metrics::new(10, 50, 200));
    }

    #[test]
    fn test_empty_directory_pruned_unless_show_all() {
        let dir = TestDir::new();
        dir.add_file("a.py", "print(1)\n");
        dir.add_dir("empty");

        let root = scan(&dir, ScanConfig::default()).unwrap();
        assert!(root.children.is_empty());
        let pruned_total = root.total_metrics;

        let root = scan(
            &dir,
            ScanConfig {
                show_all_dirs: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name(), "empty");
        assert_eq!(root.total_metrics, pruned_total);
    }

    #[test]
    fn test_directory_with_only_excluded_extensions_is_kept() {
        let dir = TestDir::new();
        dir.add_file("assets/logo.svg", "<svg/>");

        let root = scan(&dir, ScanConfig::default()).unwrap();
        let assets = child(&root, "assets");
        assert_eq!(assets.files.len(), 1);
        assert_eq!(assets.total_metrics, Metrics::size_only(6));
    }

    #[test]
    fn test_empty_root_is_pruned() {
        let dir = TestDir::new();
        assert!(scan(&dir, ScanConfig::default()).is_none());
    }

    #[test]
    fn test_empty_file() {
        let dir = TestDir::new();
        dir.add_file("empty.py", "");

        for include_blank_lines in [false, true] {
            let root = scan(
                &dir,
                ScanConfig {
                    include_blank_lines,
                    show_all_dirs: true,
                    ..Default::default()
                },
            )
            .unwrap();
            assert_eq!(root.files[0].metrics, Metrics::default());
        }
    }

    #[test]
    fn test_totals_are_sum_of_children() {
        let dir = TestDir::new();
        dir.add_file("x/1.py", "a\nb\n");
        dir.add_file("x/y/2.py", "c\n");
        dir.add_file("x/y/z/3.sh", "echo hi\n");
        dir.add_file("w/4.js", "let a = 1;\n\n");
        dir.add_file("top.yml", "k: v\n");

        let root = scan(&dir, ScanConfig::default()).unwrap();

        fn check(node: &DirectoryStats) {
            let children: Metrics = node.children.iter().map(|c| c.total_metrics).sum();
            let own: Metrics = node.files.iter().map(|f| f.metrics).sum();
            assert_eq!(node.children_metrics, children);
            assert_eq!(node.own_metrics, own);
            assert_eq!(node.total_metrics, own + children);
            node.children.iter().for_each(check);
        }
        check(&root);
        assert_eq!(root.total_metrics.lines, 6);
    }

    #[test]
    fn test_children_and_files_sorted() {
        let dir = TestDir::new();
        dir.add_file("Beta/x.py", "x\n");
        dir.add_file("alpha/x.py", "x\n");
        dir.add_file("b.py", "x\n");
        dir.add_file("A.py", "x\n");

        let root = scan(&dir, ScanConfig::default()).unwrap();
        let dirs: Vec<_> = root.children.iter().map(|d| d.name()).collect();
        let files: Vec<_> = root.files.iter().map(|f| f.name()).collect();
        assert_eq!(dirs, ["alpha", "Beta"]);
        assert_eq!(files, ["A.py", "b.py"]);
    }

    #[test]
    fn test_hidden_and_default_excludes() {
        let dir = TestDir::new();
        dir.add_file(".secret/a.py", "x\n");
        dir.add_file("node_modules/lib.js", "x\n");
        dir.add_file("static/jquery.js", "x\n");
        dir.add_file(".env", "KEY=1\n");
        dir.add_file("main.py", "x\n");

        let root = scan(&dir, ScanConfig::default()).unwrap();
        assert_eq!(root.children.len(), 0);
        let files: Vec<_> = root.files.iter().map(|f| f.name()).collect();
        assert_eq!(files, ["main.py"]);

        let root = scan(
            &dir,
            ScanConfig {
                include_hidden: true,
                ..Default::default()
            },
        )
        .unwrap();
        let dirs: Vec<_> = root.children.iter().map(|d| d.name()).collect();
        assert_eq!(dirs, [".secret"]);
        assert_eq!(root.files.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_skipped() {
        use std::os::unix::fs::symlink;

        let dir = TestDir::new();
        dir.add_file("real/a.py", "x\n");
        symlink(dir.path().join("real"), dir.path().join("link")).unwrap();
        symlink(dir.path().join("real/a.py"), dir.path().join("b.py")).unwrap();
        symlink("..", dir.path().join("real/up")).unwrap();

        let root = scan(&dir, ScanConfig::default()).unwrap();
        let dirs: Vec<_> = root.children.iter().map(|d| d.name()).collect();
        assert_eq!(dirs, ["real"]);
        assert!(root.files.is_empty());
        assert_eq!(root.total_metrics.lines, 1);
    }

    #[test]
    fn test_invalid_config_rejected_before_scan() {
        let dir = TestDir::new();
        let config = ScanConfig {
            chars_per_token: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            Scanner::new(dir.path(), config),
            Err(ConfigError::InvalidCharsPerToken(_))
        ));
    }

    #[test]
    fn test_unlistable_subdirectory_dropped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TestDir::new();
        dir.add_file("a.py", &ten_line_file());
        dir.add_file("locked/c.py", &five_line_file());
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let listable = fs::read_dir(&locked).is_ok();
        let root = scan(&dir, ScanConfig::default());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let root = root.unwrap();
        if listable {
            // permissions are not enforced for this user (e.g. root)
            assert_eq!(root.total_metrics.lines, 15);
            return;
        }
        assert!(root.children.is_empty());
        assert_eq!(root.children_metrics, Metrics::default());
        assert_eq!(root.total_metrics, Metrics::new(10, 50, 200));
    }

    #[test]
    fn test_tiny_chars_per_token_saturates() {
        let dir = TestDir::new();
        dir.add_file("a.py", "x = 1\n");
        dir.add_file("b.py", "y = 2\n");
        dir.add_file("sub/c.py", "z = 3\n");

        let config = ScanConfig {
            chars_per_token: 1e-300,
            ..Default::default()
        };
        let root = scan(&dir, config).unwrap();
        assert_eq!(root.total_metrics.tokens, u64::MAX);
        assert_eq!(root.total_metrics.lines, 3);
    }

    #[test]
    fn test_missing_directory_returns_none() {
        let dir = TestDir::new();
        let scanner = Scanner::new(dir.path(), ScanConfig::default()).unwrap();
        assert!(scanner.scan(&dir.path().join("missing")).is_none());
    }
}
