//! Frame layout for the browser
//!
//! Rows 0-3 hold the title, summary, key hints and sort mode, row 5 the
//! column header, and listing rows start at row 6.

use crate::error::TerminalError;
use crate::output::{
    ellipsize, fit_to_width, format_metrics, format_number, format_size, scaled_bar,
};

use super::state::{BrowserEntry, BrowserState};
use super::terminal::{Size, Style, Terminal};

pub const MIN_ROWS: u16 = 8;
pub const MIN_COLS: u16 = 60;
const FIRST_DATA_ROW: u16 = 6;

/// Width taken by every column except the name.
const FIXED_COLUMNS: usize = 57;

const CONTROLS: &str =
    "q quit | Enter/right open dir | left/backspace up | j/k or arrows move | s sort";

/// True if the full layout fits in `size`.
pub fn fits(size: Size) -> bool {
    size.rows >= MIN_ROWS && size.cols >= MIN_COLS
}

/// Number of listing rows that fit below the header.
pub fn visible_rows(size: Size) -> usize {
    (size.rows.saturating_sub(FIRST_DATA_ROW) as usize).max(1)
}

/// Column widths for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub name: usize,
    pub bar: usize,
}

impl Columns {
    pub fn for_width(cols: u16) -> Self {
        let cols = cols as usize;
        let bar = (cols / 10).clamp(6, 16);
        let name = cols
            .saturating_sub(FIXED_COLUMNS + (bar + 2) * 2 + 2)
            .max(12);
        Self { name, bar }
    }

    pub fn header(&self) -> String {
        format!(
            "{} {:<5} {:<7} {:>12} {:>12} {:>11} {:<bw$} {:<bw$}",
            fit_to_width("Name", self.name),
            "Type",
            "Counted",
            "Lines",
            "Tokens",
            "Size",
            "LOC Bar",
            "Token Bar",
            bw = self.bar + 2,
        )
    }

    /// One listing row. Bars are scaled against the largest data row.
    pub fn row(&self, entry: &BrowserEntry<'_>, max_lines: u64, max_tokens: u64) -> String {
        let name = fit_to_width(&entry.name(), self.name);
        let (kind, counted) = match entry {
            BrowserEntry::Parent => ("dir", "-"),
            BrowserEntry::Directory(_) => ("dir", "-"),
            BrowserEntry::File(f) if f.counted => ("file", "yes"),
            BrowserEntry::File(_) => ("file", "no"),
            BrowserEntry::Placeholder => ("-", "-"),
        };

        if let BrowserEntry::Parent = entry {
            return format!(
                "{} {:<5} {:<7} {:>12} {:>12} {:>11} {:bw$} {:bw$}",
                name,
                kind,
                counted,
                "",
                "",
                "",
                "",
                "",
                bw = self.bar + 2,
            );
        }

        let metrics = entry.metrics();
        format!(
            "{} {:<5} {:<7} {:>12} {:>12} {:>11} {} {}",
            name,
            kind,
            counted,
            format_number(metrics.lines),
            format_number(metrics.tokens),
            format_size(metrics.size_bytes),
            scaled_bar(metrics.lines, max_lines, self.bar),
            scaled_bar(metrics.tokens, max_tokens, self.bar),
        )
    }
}

/// Degraded frame shown while the terminal is below the minimum size.
pub fn draw_too_small<T: Terminal>(terminal: &mut T, size: Size) -> Result<(), TerminalError> {
    let width = (size.cols as usize).saturating_sub(1);
    terminal.write_at(
        0,
        0,
        &ellipsize("Terminal too small. Resize and retry.", width),
        Style::PLAIN,
    )?;
    if size.rows > 1 {
        terminal.write_at(1, 0, &ellipsize("Press q to quit.", width), Style::PLAIN)?;
    }
    Ok(())
}

/// Draw a full frame for `state`. `entries` must come from
/// `state.entries()` and the state must already be prepared for
/// `visible_rows(size)`.
pub fn draw<T: Terminal>(
    terminal: &mut T,
    state: &BrowserState<'_>,
    entries: &[BrowserEntry<'_>],
    size: Size,
) -> Result<(), TerminalError> {
    let width = (size.cols as usize).saturating_sub(1);
    let current = state.current();

    let title = format!("locscope | path: {}", current.path.display());
    let summary = format!(
        "total {} | own {} | subdirs {}",
        format_metrics(&current.total_metrics),
        format_metrics(&current.own_metrics),
        format_metrics(&current.children_metrics)
    );
    let sort_line = format!("sort: {}", state.sort_mode().label());

    terminal.write_at(0, 0, &ellipsize(&title, width), Style::BOLD)?;
    terminal.write_at(1, 0, &ellipsize(&summary, width), Style::PLAIN)?;
    terminal.write_at(2, 0, &ellipsize(CONTROLS, width), Style::PLAIN)?;
    terminal.write_at(3, 0, &ellipsize(&sort_line, width), Style::PLAIN)?;

    let columns = Columns::for_width(size.cols);
    terminal.write_at(5, 0, &ellipsize(&columns.header(), width), Style::UNDERLINE)?;

    let data = entries.iter().filter(|e| e.is_data());
    let max_lines = data.clone().map(|e| e.metrics().lines).max().unwrap_or(0);
    let max_tokens = data.map(|e| e.metrics().tokens).max().unwrap_or(0);

    let rows = visible_rows(size);
    let visible = entries.iter().enumerate().skip(state.scroll_offset()).take(rows);
    for (row, (index, entry)) in (FIRST_DATA_ROW..).zip(visible) {
        let style = if index == state.selected() {
            Style::REVERSE
        } else {
            Style::PLAIN
        };
        let text = columns.row(entry, max_lines, max_tokens);
        terminal.write_at(row, 0, &ellipsize(&text, width), style)?;
    }
    Ok(())
}
