//! Test utilities: temporary directory trees and a scripted terminal.
//!
//! This module is only compiled for tests and benchmarks.

use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use unicode_width::UnicodeWidthStr;

use crate::browser::{Action, Size, Style, Terminal};
use crate::error::TerminalError;

/// A temporary directory for building scan fixtures.
///
/// The directory is automatically cleaned up when dropped.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        self.add_bytes(path, content.as_bytes())
    }

    /// Write raw bytes, for content that is not valid UTF-8.
    pub fn add_bytes(&self, path: &str, content: &[u8]) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Create an empty directory (and its parents).
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Text written to one row of a `ScriptedTerminal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenLine {
    pub col: u16,
    pub text: String,
    pub style: Style,
}

/// In-memory terminal that replays a fixed list of actions.
///
/// When the script runs out it answers `Quit`, or an I/O error if
/// `fail_after_script` is set. Only the most recent frame is kept.
pub struct ScriptedTerminal {
    pub size: Size,
    pub entered: bool,
    pub left: bool,
    pub fail_after_script: bool,
    /// Number of frames started (calls to `clear`)
    pub frames: usize,
    script: VecDeque<Action>,
    screen: BTreeMap<u16, WrittenLine>,
}

impl ScriptedTerminal {
    pub fn new(rows: u16, cols: u16, script: impl IntoIterator<Item = Action>) -> Self {
        Self {
            size: Size { rows, cols },
            entered: false,
            left: false,
            fail_after_script: false,
            frames: 0,
            script: script.into_iter().collect(),
            screen: BTreeMap::new(),
        }
    }

    /// Row `row` of the last frame.
    pub fn line_at(&self, row: u16) -> Option<&WrittenLine> {
        self.screen.get(&row)
    }

    /// True if any row of the last frame contains `needle`.
    pub fn screen_contains(&self, needle: &str) -> bool {
        self.screen.values().any(|line| line.text.contains(needle))
    }
}

impl Terminal for ScriptedTerminal {
    fn enter(&mut self) -> Result<(), TerminalError> {
        self.entered = true;
        Ok(())
    }

    fn leave(&mut self) -> Result<(), TerminalError> {
        self.left = true;
        Ok(())
    }

    fn size(&self) -> Result<Size, TerminalError> {
        Ok(self.size)
    }

    fn clear(&mut self) -> Result<(), TerminalError> {
        self.frames += 1;
        self.screen.clear();
        Ok(())
    }

    fn write_at(
        &mut self,
        row: u16,
        col: u16,
        text: &str,
        style: Style,
    ) -> Result<(), TerminalError> {
        assert!(
            text.width() < self.size.cols as usize || self.size.cols == 0,
            "row {} overflows {} columns: {:?}",
            row,
            self.size.cols,
            text
        );
        self.screen.insert(
            row,
            WrittenLine {
                col,
                text: text.to_string(),
                style,
            },
        );
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TerminalError> {
        Ok(())
    }

    fn read_action(&mut self) -> Result<Option<Action>, TerminalError> {
        match self.script.pop_front() {
            Some(action) => Ok(Some(action)),
            None if self.fail_after_script => {
                Err(TerminalError::Io(io::Error::other("script exhausted")))
            }
            None => Ok(Some(Action::Quit)),
        }
    }
}
