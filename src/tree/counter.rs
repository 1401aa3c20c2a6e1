//! Line, character and token counting for a single file

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::metrics::Metrics;

/// Count lines and estimate tokens for a file already known to be code.
///
/// The file is streamed line by line. Invalid UTF-8 sequences are dropped
/// rather than failing the file. If the file cannot be read, only
/// `size_bytes` is reported.
pub fn count_file_metrics(
    path: &Path,
    chars_per_token: f64,
    include_blank_lines: bool,
    size_bytes: u64,
) -> Metrics {
    let counted = File::open(path)
        .and_then(|file| count_reader(BufReader::new(file), include_blank_lines));
    match counted {
        Ok((lines, chars)) => {
            Metrics::new(lines, estimate_tokens(chars, chars_per_token), size_bytes)
        }
        Err(e) => {
            tracing::debug!("cannot read {}: {}", path.display(), e);
            Metrics::size_only(size_bytes)
        }
    }
}

/// `ceil(chars / chars_per_token)`, or zero for no characters. Saturates at
/// `u64::MAX` for very small ratios.
pub fn estimate_tokens(chars: u64, chars_per_token: f64) -> u64 {
    if chars == 0 {
        return 0;
    }
    (chars as f64 / chars_per_token).ceil() as u64
}

/// Streaming form of `count_lines_and_chars`.
///
/// Input is split after each `\n`, so a `\r\n` pair never straddles two
/// segments and a lone `\r` is handled inside its segment.
pub fn count_reader<R: BufRead>(
    mut reader: R,
    include_blank_lines: bool,
) -> io::Result<(u64, u64)> {
    let mut counts = (0, 0);
    let mut segment = Vec::new();
    loop {
        segment.clear();
        if reader.read_until(b'\n', &mut segment)? == 0 {
            return Ok(counts);
        }
        count_text(&decode_dropping_invalid(&segment), include_blank_lines, &mut counts);
    }
}

/// Count countable lines and characters.
///
/// `\r\n`, `\r` and `\n` all end a line and each counts as one character.
/// A whitespace-only line is counted only when `include_blank_lines` is set.
pub fn count_lines_and_chars(content: &[u8], include_blank_lines: bool) -> (u64, u64) {
    let mut counts = (0, 0);
    count_text(&decode_dropping_invalid(content), include_blank_lines, &mut counts);
    counts
}

fn count_text(text: &str, include_blank_lines: bool, (lines, chars): &mut (u64, u64)) {
    let mut rest = text;

    while !rest.is_empty() {
        let (line, terminator_len) = match rest.find(['\n', '\r']) {
            Some(pos) if rest[pos..].starts_with("\r\n") => (&rest[..pos], 2),
            Some(pos) => (&rest[..pos], 1),
            None => (rest, 0),
        };

        *chars += line.chars().count() as u64;
        if terminator_len > 0 {
            *chars += 1;
        }
        if include_blank_lines || !line.trim().is_empty() {
            *lines += 1;
        }

        rest = &rest[line.len() + terminator_len..];
    }
}

fn decode_dropping_invalid(content: &[u8]) -> String {
    content
        .utf8_chunks()
        .map(|chunk| chunk.valid())
        .collect()
}
