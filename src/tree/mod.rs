//! Directory scanning
//!
//! - `config` - Scan configuration and built-in defaults
//! - `filter` - Which directories are walked and which files are listed or counted
//! - `counter` - Line and token counting for a single file
//! - `scanner` - Recursive scan producing a `DirectoryStats` tree

mod config;
mod counter;
mod filter;
mod scanner;

pub use config::{
    DEFAULT_CODE_EXTENSIONS, DEFAULT_EXCLUDE_PATTERNS, DEFAULT_EXCLUDED_DIRS, ScanConfig,
    normalize_extensions,
};
pub use counter::{count_file_metrics, count_lines_and_chars, count_reader, estimate_tokens};
pub use filter::PathFilter;
pub use scanner::Scanner;
