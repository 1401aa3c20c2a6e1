//! Shared formatting helpers for tree output and the browser

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::metrics::{FileStats, Metrics};

/// Calculate the prefix for children of a node.
/// The root's children get no indent at all.
pub fn child_prefix(prefix: &str, is_last: bool, is_root: bool) -> String {
    if is_root {
        String::new()
    } else if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    }
}

pub fn connector(is_last: bool) -> &'static str {
    if is_last { "└── " } else { "├── " }
}

/// `1,234 lines, ~567 tokens, 1.2 KiB`
pub fn format_metrics(metrics: &Metrics) -> String {
    format!(
        "{} lines, ~{} tokens, {}",
        format_number(metrics.lines),
        format_number(metrics.tokens),
        format_size(metrics.size_bytes)
    )
}

/// File annotation, noting the extension when the file was not counted.
pub fn format_file_description(file: &FileStats) -> String {
    if file.counted {
        return format_metrics(&file.metrics);
    }
    let ext = file.extension().unwrap_or_else(|| "<no-ext>".to_string());
    format!(
        "{}; excluded extension ({})",
        format_metrics(&file.metrics),
        ext
    )
}

/// Format a number with thousand separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Format a byte count with binary units and one decimal.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

/// Truncate to `width` terminal cells, ending in `...` when there is room.
pub fn ellipsize(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return take_cells(text, width);
    }
    let mut out = take_cells(text, width - 3);
    out.push_str("...");
    out
}

/// Ellipsize to `width` cells, then pad with spaces to exactly `width`.
pub fn fit_to_width(text: &str, width: usize) -> String {
    let mut out = ellipsize(text, width);
    let used = out.width();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

/// Longest prefix of `text` that fits in `width` cells.
fn take_cells(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= width
        })
        .collect()
}

/// `[####    ]` with `bar_width` cells filled in proportion to
/// `value / max_value`. Any non-zero value shows at least one cell.
pub fn scaled_bar(value: u64, max_value: u64, bar_width: usize) -> String {
    if bar_width == 0 {
        return "[]".to_string();
    }
    if max_value == 0 || value == 0 {
        return format!("[{}]", " ".repeat(bar_width));
    }

    let filled = ((value as f64 / max_value as f64) * bar_width as f64).round() as usize;
    let filled = filled.clamp(1, bar_width);
    format!("[{}{}]", "#".repeat(filled), " ".repeat(bar_width - filled))
}
