//! Configuration for scanning

use std::collections::BTreeSet;

use crate::error::ConfigError;

/// Directory names and relative paths skipped by default.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".idea",
    ".cursor",
    ".local-dev",
    ".ruff_cache",
    "node_modules",
    "vendor",
    "var",
    "ext",
    "venv",
    "GraphQL2/Schema",
    "wp-content",
    "swagger-ui",
];

/// Regexes for minified and vendored JavaScript, matched against relative
/// paths and bare names.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[r".*jquery.*", r".*min\.js$", r".*android.js$"];

/// Extensions whose files are counted for lines and tokens.
pub const DEFAULT_CODE_EXTENSIONS: &[&str] = &[
    ".php", ".py", ".js", ".sh", ".twig", ".phtml", ".tf", ".yaml", ".yml", ".cpp",
];

const DEFAULT_CHARS_PER_TOKEN: f64 = 4.0;

/// Configuration for scan behavior.
///
/// `Default` carries the built-in exclusion and extension lists; user values
/// are merged on top with the `with_*` helpers.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub chars_per_token: f64,
    pub include_blank_lines: bool,
    /// Keep directories that would otherwise be pruned as empty
    pub show_all_dirs: bool,
    pub include_hidden: bool,
    pub excluded_dirs: BTreeSet<String>,
    pub exclude_patterns: Vec<String>,
    /// Lowercase, dot-prefixed
    pub code_extensions: BTreeSet<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
            include_blank_lines: false,
            show_all_dirs: false,
            include_hidden: false,
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            code_extensions: DEFAULT_CODE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ScanConfig {
    /// Add directory names or relative paths to the exclusion set.
    pub fn with_excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_dirs.extend(
            dirs.into_iter()
                .map(|d| d.as_ref().trim().to_string())
                .filter(|d| !d.is_empty()),
        );
        self
    }

    /// Add exclusion regexes after the existing ones.
    pub fn with_exclude_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(|p| p.as_ref().to_string()));
        self
    }

    /// Replace the code extensions with a comma-separated list.
    /// An empty list keeps the defaults.
    pub fn with_extensions_csv(mut self, raw: &str) -> Self {
        let extensions = normalize_extensions(raw);
        if !extensions.is_empty() {
            self.code_extensions = extensions;
        }
        self
    }

    /// Check values that would otherwise surface as per-file failures.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.chars_per_token.is_finite() && self.chars_per_token > 0.0) {
            return Err(ConfigError::InvalidCharsPerToken(self.chars_per_token));
        }
        Ok(())
    }
}

/// Parse a comma-separated extension list into lowercase, dot-prefixed
/// entries. Blank items are dropped.
pub fn normalize_extensions(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .map(|item| {
            if item.starts_with('.') {
                item
            } else {
                format!(".{}", item)
            }
        })
        .collect()
}
