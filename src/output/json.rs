//! JSON output formatting

use std::io::{self, Write};

use crate::metrics::DirectoryStats;

/// Serialize the scan tree as pretty-printed JSON.
pub fn to_json(node: &DirectoryStats) -> serde_json::Result<String> {
    serde_json::to_string_pretty(node)
}

/// Print the scan tree as pretty-printed JSON to stdout.
pub fn print_json(node: &DirectoryStats) -> io::Result<()> {
    let json = to_json(node).map_err(io::Error::other)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)
}
