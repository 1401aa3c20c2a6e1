//! Interactive ncdu-style browser
//!
//! - `state` - Navigation state machine and row ordering
//! - `view` - Frame layout
//! - `terminal` - Terminal capability trait and the crossterm implementation
//!
//! The loop is strictly read-render-input: each key is applied in full and
//! the next frame drawn before another key is read.

mod state;
mod terminal;
mod view;

use std::io::{self, Write};

use crate::error::TerminalError;
use crate::metrics::DirectoryStats;
use crate::output::{OutputConfig, TreeFormatter};

pub use state::{Action, BrowserEntry, BrowserState, Flow, SortMode, sorted_entries};
pub use terminal::{CrosstermTerminal, Size, Style, Terminal, action_for_key};
pub use view::{MIN_COLS, MIN_ROWS};

/// Run the browser until the user quits. The terminal is restored on every
/// exit path, including errors.
pub fn run<T: Terminal>(root: &DirectoryStats, terminal: &mut T) -> Result<(), TerminalError> {
    terminal.enter()?;
    let result = event_loop(root, terminal);
    let restored = terminal.leave();
    result.and(restored)
}

fn event_loop<T: Terminal>(root: &DirectoryStats, terminal: &mut T) -> Result<(), TerminalError> {
    let mut state = BrowserState::new(root);

    loop {
        let entries = state.entries();
        let size = terminal.size()?;
        terminal.clear()?;

        if !view::fits(size) {
            view::draw_too_small(terminal, size)?;
            terminal.flush()?;
            if terminal.read_action()? == Some(Action::Quit) {
                return Ok(());
            }
            continue;
        }

        let rows = view::visible_rows(size);
        state.prepare(entries.len(), rows);
        view::draw(terminal, &state, &entries, size)?;
        terminal.flush()?;

        let Some(action) = terminal.read_action()? else {
            continue;
        };
        if state.handle(action, rows) == Flow::Quit {
            return Ok(());
        }
    }
}

/// Run the browser on `terminal`, or print the plain tree to `out` if the
/// terminal fails at any point. A diagnostic goes to `err` in that case.
pub fn browse_or_fallback<T, O, E>(
    root: &DirectoryStats,
    terminal: Result<T, TerminalError>,
    out: &mut O,
    err: &mut E,
) -> io::Result<()>
where
    T: Terminal,
    O: Write,
    E: Write,
{
    let result = terminal.and_then(|mut terminal| run(root, &mut terminal));
    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::debug!("interactive mode failed: {:?}", e);
            fallback(root, &e, out, err)
        }
    }
}

fn fallback<O: Write, E: Write>(
    root: &DirectoryStats,
    error: &TerminalError,
    out: &mut O,
    err: &mut E,
) -> io::Result<()> {
    writeln!(
        err,
        "ncdu mode unavailable ({}). Falling back to tree output.",
        error
    )?;
    let formatter = TreeFormatter::new(OutputConfig { use_color: false });
    write!(out, "{}", formatter.format(root))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::metrics::{FileStats, Metrics};
    use crate::test_utils::ScriptedTerminal;

    use super::*;

    fn sample_tree() -> DirectoryStats {
        let file = |path: &str, lines, tokens| FileStats {
            path: PathBuf::from(path),
            counted: true,
            metrics: Metrics::new(lines, tokens, 10),
        };
        DirectoryStats::new(
            PathBuf::from("/proj"),
            vec![DirectoryStats::new(
                PathBuf::from("/proj/lib"),
                Vec::new(),
                vec![file("/proj/lib/util.py", 40, 400)],
            )],
            vec![file("/proj/main.py", 10, 100)],
        )
    }

    #[test]
    fn test_quit_restores_terminal() {
        let tree = sample_tree();
        let mut terminal = ScriptedTerminal::new(24, 100, [Action::Quit]);
        run(&tree, &mut terminal).unwrap();

        assert!(terminal.entered);
        assert!(terminal.left);
        assert!(terminal.screen_contains("locscope | path: /proj"));
        assert!(terminal.screen_contains("sort: tokens"));
    }

    #[test]
    fn test_selected_row_is_highlighted() {
        let tree = sample_tree();
        let mut terminal = ScriptedTerminal::new(24, 100, [Action::Down, Action::Quit]);
        run(&tree, &mut terminal).unwrap();

        let highlighted = terminal.line_at(7).unwrap();
        assert!(highlighted.text.starts_with("main.py"));
        assert_eq!(highlighted.style, Style::REVERSE);
        assert_eq!(terminal.line_at(6).unwrap().style, Style::PLAIN);
    }

    #[test]
    fn test_open_directory_and_back() {
        let tree = sample_tree();
        let mut terminal = ScriptedTerminal::new(24, 100, [Action::Open]);
        run(&tree, &mut terminal).unwrap();
        assert!(terminal.screen_contains("locscope | path: /proj/lib"));
        assert!(terminal.line_at(6).unwrap().text.starts_with(".."));
        assert!(terminal.line_at(7).unwrap().text.starts_with("util.py"));

        let mut terminal = ScriptedTerminal::new(24, 100, [Action::Open, Action::Back]);
        run(&tree, &mut terminal).unwrap();
        assert!(terminal.line_at(6).unwrap().text.starts_with("lib"));
        assert_eq!(terminal.line_at(6).unwrap().style, Style::REVERSE);
    }

    #[test]
    fn test_cycle_sort_shows_mode() {
        let tree = sample_tree();
        let mut terminal = ScriptedTerminal::new(24, 100, [Action::CycleSort; 3]);
        run(&tree, &mut terminal).unwrap();
        assert!(terminal.screen_contains("sort: name"));
    }

    #[test]
    fn test_too_small_accepts_only_quit() {
        let tree = sample_tree();
        let mut terminal =
            ScriptedTerminal::new(5, 40, [Action::Open, Action::CycleSort, Action::Down]);
        run(&tree, &mut terminal).unwrap();

        assert!(terminal.screen_contains("Terminal too small"));
        assert!(terminal.screen_contains("Press q to quit."));
        assert!(!terminal.screen_contains("locscope | path"));
        assert_eq!(terminal.frames, 4);
    }

    #[test]
    fn test_wide_names_fit_the_screen() {
        let tree = DirectoryStats::new(
            PathBuf::from("/プロジェクト/ソースコードのディレクトリ"),
            Vec::new(),
            vec![FileStats {
                path: PathBuf::from("/プロジェクト/ソースコードのディレクトリ/設定ファイル.py"),
                counted: true,
                metrics: Metrics::new(3, 3, 3),
            }],
        );
        // ScriptedTerminal rejects any row wider than the screen
        let mut terminal = ScriptedTerminal::new(10, 60, [Action::Quit]);
        run(&tree, &mut terminal).unwrap();
        assert!(terminal.line_at(6).unwrap().text.starts_with("設定ファ"));
    }

    #[test]
    fn test_scrolling_window() {
        let files = (0..40)
            .map(|i| FileStats {
                path: PathBuf::from(format!("/big/f{:02}.py", i)),
                counted: true,
                metrics: Metrics::new(1, 1, 1),
            })
            .collect();
        let tree = DirectoryStats::new(PathBuf::from("/big"), Vec::new(), files);

        // 10 rows leaves 4 listing rows
        let mut terminal = ScriptedTerminal::new(10, 80, [Action::End]);
        run(&tree, &mut terminal).unwrap();
        assert!(terminal.line_at(9).unwrap().text.starts_with("f39.py"));
        assert_eq!(terminal.line_at(9).unwrap().style, Style::REVERSE);
        assert!(terminal.line_at(6).unwrap().text.starts_with("f36.py"));
    }

    #[test]
    fn test_fallback_when_terminal_unavailable() {
        let tree = sample_tree();
        let mut out = Vec::new();
        let mut err = Vec::new();
        browse_or_fallback::<ScriptedTerminal, _, _>(
            &tree,
            Err(TerminalError::NotATerminal),
            &mut out,
            &mut err,
        )
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        let err = String::from_utf8(err).unwrap();
        assert!(out.starts_with(". (own: 10 lines"));
        assert!(out.contains("└── main.py"));
        assert!(err.contains("Falling back to tree output"));
        assert!(err.contains("not an interactive terminal"));
    }

    #[test]
    fn test_fallback_on_mid_session_error() {
        let tree = sample_tree();
        let mut terminal = ScriptedTerminal::new(24, 100, [Action::Down]);
        terminal.fail_after_script = true;

        let mut out = Vec::new();
        let mut err = Vec::new();
        browse_or_fallback(&tree, Ok(terminal), &mut out, &mut err).unwrap();

        assert!(String::from_utf8(out).unwrap().contains("lib (own:"));
        assert!(String::from_utf8(err).unwrap().contains("terminal I/O error"));
    }

    #[test]
    fn test_no_fallback_on_normal_quit() {
        let tree = sample_tree();
        let terminal = ScriptedTerminal::new(24, 100, [Action::Quit]);
        let mut out = Vec::new();
        let mut err = Vec::new();
        browse_or_fallback(&tree, Ok(terminal), &mut out, &mut err).unwrap();
        assert!(out.is_empty());
        assert!(err.is_empty());
    }
}
