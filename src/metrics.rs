//! Size metrics and the scanned directory tree
//!
//! A scan produces a single rooted `DirectoryStats` tree. Every node carries
//! its own metrics (from the files directly inside it), the sum of its child
//! directories' totals, and the total of both.

use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

/// Line, token and byte counts. Merging is saturating addition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Metrics {
    pub lines: u64,
    pub tokens: u64,
    pub size_bytes: u64,
}

impl Metrics {
    pub fn new(lines: u64, tokens: u64, size_bytes: u64) -> Self {
        Self {
            lines,
            tokens,
            size_bytes,
        }
    }

    /// Metrics for a file whose content was not (or could not be) counted.
    pub fn size_only(size_bytes: u64) -> Self {
        Self {
            size_bytes,
            ..Default::default()
        }
    }

    pub fn merge(&mut self, other: &Metrics) {
        self.lines = self.lines.saturating_add(other.lines);
        self.tokens = self.tokens.saturating_add(other.tokens);
        self.size_bytes = self.size_bytes.saturating_add(other.size_bytes);
    }

    /// True when there are no lines and no tokens. Size is not considered.
    pub fn has_no_code(&self) -> bool {
        self.lines == 0 && self.tokens == 0
    }
}

impl Add for Metrics {
    type Output = Metrics;

    fn add(mut self, rhs: Metrics) -> Metrics {
        self.merge(&rhs);
        self
    }
}

impl AddAssign for Metrics {
    fn add_assign(&mut self, rhs: Metrics) {
        self.merge(&rhs);
    }
}

impl Sum for Metrics {
    fn sum<I: Iterator<Item = Metrics>>(iter: I) -> Metrics {
        iter.fold(Metrics::default(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Metrics> for Metrics {
    fn sum<I: Iterator<Item = &'a Metrics>>(iter: I) -> Metrics {
        iter.copied().sum()
    }
}

/// A listed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileStats {
    #[serde(serialize_with = "serialize_lossy_path")]
    pub path: PathBuf,
    /// False when the extension is not a code extension; such files only
    /// contribute their size.
    pub counted: bool,
    pub metrics: Metrics,
}

impl FileStats {
    pub fn name(&self) -> String {
        file_name(&self.path)
    }

    /// Lowercased, dot-prefixed extension, or `None` when there is none.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .filter(|e| !e.is_empty())
            .map(|e| format!(".{}", e))
    }
}

/// A scanned directory with aggregated metrics.
///
/// `children` and `files` are sorted case-insensitively by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryStats {
    #[serde(serialize_with = "serialize_lossy_path")]
    pub path: PathBuf,
    pub own_metrics: Metrics,
    pub children_metrics: Metrics,
    pub total_metrics: Metrics,
    pub children: Vec<DirectoryStats>,
    pub files: Vec<FileStats>,
}

impl DirectoryStats {
    /// Build a node from its parts, deriving all three metric fields and
    /// fixing the ordering of `children` and `files`.
    pub fn new(
        path: PathBuf,
        mut children: Vec<DirectoryStats>,
        mut files: Vec<FileStats>,
    ) -> Self {
        children.sort_by_cached_key(|c| sort_key(&c.path));
        files.sort_by_cached_key(|f| sort_key(&f.path));

        let own_metrics: Metrics = files.iter().map(|f| &f.metrics).sum();
        let children_metrics: Metrics = children.iter().map(|c| &c.total_metrics).sum();

        Self {
            path,
            own_metrics,
            children_metrics,
            total_metrics: own_metrics + children_metrics,
            children,
            files,
        }
    }

    /// A node with nothing in it, used when the scan root itself is pruned.
    pub fn empty(path: PathBuf) -> Self {
        Self::new(path, Vec::new(), Vec::new())
    }

    pub fn name(&self) -> String {
        file_name(&self.path)
    }

    /// True when the node would be dropped by structural pruning.
    pub fn is_prunable(&self) -> bool {
        self.total_metrics.has_no_code() && self.children.is_empty() && self.files.is_empty()
    }
}

/// Case-insensitive name with the exact name as a tie-break.
fn sort_key(path: &Path) -> (String, String) {
    let name = file_name(path);
    (name.to_lowercase(), name)
}

/// Paths that are not valid UTF-8 are written with replacement characters.
fn serialize_lossy_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string())
}
