//! Tree formatter for buffered output
//!
//! This module provides `TreeFormatter` which formats a complete
//! `DirectoryStats` tree into a string or prints it with colors.

use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::metrics::{DirectoryStats, FileStats};

use super::config::OutputConfig;
use super::utils::{child_prefix, connector, format_file_description, format_metrics};

/// Formatter for the static tree view.
pub struct TreeFormatter {
    config: OutputConfig,
}

/// A row of the tree: child directories come before files.
enum Row<'a> {
    Dir(&'a DirectoryStats),
    File(&'a FileStats),
}

fn rows(node: &DirectoryStats) -> Vec<Row<'_>> {
    node.children
        .iter()
        .map(Row::Dir)
        .chain(node.files.iter().map(Row::File))
        .collect()
}

fn dir_annotation(node: &DirectoryStats) -> String {
    format!(
        "(own: {}; subdirs: {}; total: {})",
        format_metrics(&node.own_metrics),
        format_metrics(&node.children_metrics),
        format_metrics(&node.total_metrics)
    )
}

fn dir_label(node: &DirectoryStats, is_root: bool) -> String {
    if is_root { ".".to_string() } else { node.name() }
}

impl TreeFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Render the tree as plain text, one line per node.
    pub fn format(&self, node: &DirectoryStats) -> String {
        let mut output = String::new();
        self.format_dir(node, &mut output, "", true, true);
        output
    }

    pub fn print(&self, node: &DirectoryStats) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.print_dir(node, &mut stdout, "", true, true)?;
        stdout.flush()
    }

    fn format_dir(
        &self,
        node: &DirectoryStats,
        output: &mut String,
        prefix: &str,
        is_last: bool,
        is_root: bool,
    ) {
        if !is_root {
            output.push_str(prefix);
            output.push_str(connector(is_last));
        }
        output.push_str(&dir_label(node, is_root));
        output.push(' ');
        output.push_str(&dir_annotation(node));
        output.push('\n');

        let new_prefix = child_prefix(prefix, is_last, is_root);
        let rows = rows(node);
        for (i, row) in rows.iter().enumerate() {
            let child_is_last = i == rows.len() - 1;
            match row {
                Row::Dir(dir) => self.format_dir(dir, output, &new_prefix, child_is_last, false),
                Row::File(file) => {
                    output.push_str(&new_prefix);
                    output.push_str(connector(child_is_last));
                    output.push_str(&file.name());
                    output.push_str(" (");
                    output.push_str(&format_file_description(file));
                    output.push_str(")\n");
                }
            }
        }
    }

    fn print_dir(
        &self,
        node: &DirectoryStats,
        stdout: &mut StandardStream,
        prefix: &str,
        is_last: bool,
        is_root: bool,
    ) -> io::Result<()> {
        if !is_root {
            write!(stdout, "{}{}", prefix, connector(is_last))?;
        }
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
        write!(stdout, "{}", dir_label(node, is_root))?;
        stdout.reset()?;
        writeln!(stdout, " {}", dir_annotation(node))?;

        let new_prefix = child_prefix(prefix, is_last, is_root);
        let rows = rows(node);
        for (i, row) in rows.iter().enumerate() {
            let child_is_last = i == rows.len() - 1;
            match row {
                Row::Dir(dir) => self.print_dir(dir, stdout, &new_prefix, child_is_last, false)?,
                Row::File(file) => {
                    write!(stdout, "{}{}", new_prefix, connector(child_is_last))?;
                    if file.counted {
                        stdout.set_color(ColorSpec::new().set_fg(Some(Color::White)))?;
                    } else {
                        stdout.set_color(ColorSpec::new().set_dimmed(true))?;
                    }
                    write!(stdout, "{}", file.name())?;
                    stdout.reset()?;
                    writeln!(stdout, " ({})", format_file_description(file))?;
                }
            }
        }
        Ok(())
    }
}
