//! Navigation state for the interactive browser
//!
//! `BrowserState` is a small state machine over the immutable scan tree:
//! the directory being shown, a stack of checkpoints to return to, the
//! selected row, the scroll offset and the sort mode. Every keypress maps to
//! an `Action` which `handle` applies in full before the next frame.

use std::cmp::Reverse;

use crate::metrics::{DirectoryStats, FileStats, Metrics};

/// Logical input, decoupled from the physical key that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    /// Enter the selected directory, or go back on the `..` row
    Open,
    Back,
    CycleSort,
    Quit,
}

/// Row ordering, cycled with `next`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    Tokens,
    Lines,
    Size,
    Name,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Tokens => SortMode::Lines,
            SortMode::Lines => SortMode::Size,
            SortMode::Size => SortMode::Name,
            SortMode::Name => SortMode::Tokens,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Tokens => "tokens",
            SortMode::Lines => "lines",
            SortMode::Size => "size",
            SortMode::Name => "name",
        }
    }

    fn primary(self, metrics: &Metrics) -> u64 {
        match self {
            SortMode::Tokens => metrics.tokens,
            SortMode::Lines => metrics.lines,
            SortMode::Size => metrics.size_bytes,
            SortMode::Name => 0,
        }
    }
}

/// One row of the listing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrowserEntry<'a> {
    /// Synthetic `..` row, present whenever there is somewhere to go back to
    Parent,
    Directory(&'a DirectoryStats),
    File(&'a FileStats),
    /// Stands in for an empty listing so there is always a selectable row
    Placeholder,
}

impl BrowserEntry<'_> {
    pub fn name(&self) -> String {
        match self {
            BrowserEntry::Parent => "..".to_string(),
            BrowserEntry::Directory(d) => d.name(),
            BrowserEntry::File(f) => f.name(),
            BrowserEntry::Placeholder => "<empty>".to_string(),
        }
    }

    /// Directory totals or file metrics; zero for synthetic rows.
    pub fn metrics(&self) -> Metrics {
        match self {
            BrowserEntry::Directory(d) => d.total_metrics,
            BrowserEntry::File(f) => f.metrics,
            BrowserEntry::Parent | BrowserEntry::Placeholder => Metrics::default(),
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, BrowserEntry::Directory(_) | BrowserEntry::File(_))
    }
}

/// Directories and files of one node in display order.
///
/// `Name` puts directories first, then sorts by lowercase name. The metric
/// modes sort by the metric descending, then directories first, then
/// lowercase name. The exact name breaks any remaining tie so the order is
/// total.
pub fn sorted_entries<'a>(
    directories: &'a [DirectoryStats],
    files: &'a [FileStats],
    mode: SortMode,
) -> Vec<BrowserEntry<'a>> {
    let mut entries: Vec<BrowserEntry<'a>> = directories
        .iter()
        .map(BrowserEntry::Directory)
        .chain(files.iter().map(BrowserEntry::File))
        .collect();

    entries.sort_by_cached_key(|entry| {
        let name = entry.name();
        (
            Reverse(mode.primary(&entry.metrics())),
            !matches!(entry, BrowserEntry::Directory(_)),
            name.to_lowercase(),
            name,
        )
    });
    entries
}

/// Whether the browser keeps running after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint<'a> {
    node: &'a DirectoryStats,
    selected: usize,
    scroll_offset: usize,
}

/// Current position in the tree plus everything needed to go back.
#[derive(Debug, Clone)]
pub struct BrowserState<'a> {
    current: &'a DirectoryStats,
    history: Vec<Checkpoint<'a>>,
    selected: usize,
    scroll_offset: usize,
    sort_mode: SortMode,
}

impl<'a> BrowserState<'a> {
    pub fn new(root: &'a DirectoryStats) -> Self {
        Self {
            current: root,
            history: Vec::new(),
            selected: 0,
            scroll_offset: 0,
            sort_mode: SortMode::default(),
        }
    }

    pub fn current(&self) -> &'a DirectoryStats {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Rows for the current node. Never empty.
    pub fn entries(&self) -> Vec<BrowserEntry<'a>> {
        let mut entries = Vec::new();
        if !self.history.is_empty() {
            entries.push(BrowserEntry::Parent);
        }
        entries.extend(sorted_entries(
            &self.current.children,
            &self.current.files,
            self.sort_mode,
        ));
        if entries.is_empty() {
            entries.push(BrowserEntry::Placeholder);
        }
        entries
    }

    /// Clamp the selection to the listing and scroll it into a window of
    /// `visible_rows` rows.
    pub fn prepare(&mut self, entry_count: usize, visible_rows: usize) {
        self.clamp_selection(entry_count);
        self.scroll_into_view(visible_rows);
    }

    fn clamp_selection(&mut self, entry_count: usize) {
        self.selected = self.selected.min(entry_count.saturating_sub(1));
    }

    /// Move `scroll_offset` the least amount that keeps `selected` inside
    /// `[scroll_offset, scroll_offset + visible_rows)`.
    pub fn scroll_into_view(&mut self, visible_rows: usize) {
        let visible_rows = visible_rows.max(1);
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        }
        if self.selected >= self.scroll_offset + visible_rows {
            self.scroll_offset = self.selected + 1 - visible_rows;
        }
    }

    /// Apply one action. `page_rows` is the number of data rows on screen,
    /// used for paging.
    pub fn handle(&mut self, action: Action, page_rows: usize) -> Flow {
        let entries = self.entries();
        let last = entries.len() - 1;
        self.clamp_selection(entries.len());

        match action {
            Action::Quit => return Flow::Quit,
            Action::Up => self.selected = self.selected.saturating_sub(1),
            Action::Down => self.selected = (self.selected + 1).min(last),
            Action::PageUp => self.selected = self.selected.saturating_sub(page_rows.max(1)),
            Action::PageDown => self.selected = (self.selected + page_rows.max(1)).min(last),
            Action::Home => self.selected = 0,
            Action::End => self.selected = last,
            Action::CycleSort => {
                self.sort_mode = self.sort_mode.next();
                self.selected = 0;
                self.scroll_offset = 0;
            }
            Action::Open => match entries[self.selected] {
                BrowserEntry::Directory(dir) => self.enter(dir),
                BrowserEntry::Parent => self.go_back(),
                BrowserEntry::File(_) | BrowserEntry::Placeholder => {}
            },
            Action::Back => self.go_back(),
        }
        Flow::Continue
    }

    fn enter(&mut self, dir: &'a DirectoryStats) {
        self.history.push(Checkpoint {
            node: self.current,
            selected: self.selected,
            scroll_offset: self.scroll_offset,
        });
        self.current = dir;
        self.selected = 0;
        self.scroll_offset = 0;
    }

    fn go_back(&mut self) {
        if let Some(checkpoint) = self.history.pop() {
            self.current = checkpoint.node;
            self.selected = checkpoint.selected;
            self.scroll_offset = checkpoint.scroll_offset;
        }
    }
}
