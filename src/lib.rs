//! locscope - lines of code and token estimates per directory
//!
//! A single recursive scan builds a `DirectoryStats` tree which is then shown
//! as an indented tree, dumped as JSON, or explored in an ncdu-style browser.

pub mod browser;
pub mod error;
pub mod metrics;
pub mod output;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{ConfigError, TerminalError};
pub use metrics::{DirectoryStats, FileStats, Metrics};
pub use output::{OutputConfig, TreeFormatter, print_json};
pub use tree::{PathFilter, ScanConfig, Scanner};
