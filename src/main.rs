//! CLI entry point for locscope

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{ArgAction, Parser, ValueEnum};
use locscope::browser::{self, CrosstermTerminal};
use locscope::{
    ConfigError, DirectoryStats, OutputConfig, ScanConfig, Scanner, TreeFormatter, print_json,
};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `debug`.
const LOG_ENV: &str = "LOCSCOPE_LOG";

/// How to present the scan results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Interactive browser (falls back to tree when not on a terminal)
    #[default]
    Ncdu,
    /// Static indented tree
    Tree,
    /// Pretty-printed JSON
    Json,
}

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "locscope")]
#[command(
    about = "Count lines of code and estimated tokens per directory, \
             then show a report in tree or ncdu-like mode"
)]
#[command(version)]
struct Args {
    /// Directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Output mode
    #[arg(long, value_enum, default_value = "ncdu")]
    mode: Mode,

    /// Token estimation ratio (characters per token)
    #[arg(
        long = "chars-per-token",
        value_name = "FLOAT",
        default_value = "4.0",
        allow_negative_numbers = true
    )]
    chars_per_token: f64,

    /// Count blank lines as code lines
    #[arg(long = "include-blank-lines")]
    include_blank_lines: bool,

    /// Show directories even when they have 0 lines and 0 tokens
    #[arg(long = "all-dirs")]
    all_dirs: bool,

    /// Directory name or relative path to exclude (can be used multiple times)
    #[arg(long = "exclude-dir", value_name = "NAME|PATH")]
    exclude_dir: Vec<String>,

    /// Regex excluding files and directories by relative path or name
    /// (can be used multiple times, adds to the defaults:
    /// .*jquery.*, .*min\.js$, .*android.js$)
    #[arg(long = "exclude-path-regex", value_name = "REGEX")]
    exclude_path_regex: Vec<String>,

    /// Comma-separated file extensions to treat as code
    /// (default: .php,.py,.js,.sh,.twig,.phtml,.tf,.yaml,.yml,.cpp)
    #[arg(long = "extensions", value_name = "CSV")]
    extensions: Option<String>,

    /// Include hidden (dot-prefixed) files and directories
    #[arg(long = "include-hidden")]
    include_hidden: bool,

    /// Control color output for tree mode: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn scan_config(&self) -> ScanConfig {
        let config = ScanConfig {
            chars_per_token: self.chars_per_token,
            include_blank_lines: self.include_blank_lines,
            show_all_dirs: self.all_dirs,
            include_hidden: self.include_hidden,
            ..Default::default()
        }
        .with_excluded_dirs(&self.exclude_dir)
        .with_exclude_patterns(&self.exclude_path_regex);

        match self.extensions {
            Some(ref csv) => config.with_extensions_csv(csv),
            None => config,
        }
    }
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Resolve the root to an absolute directory path.
fn resolve_root(path: &Path) -> Result<PathBuf, ConfigError> {
    let root = path.canonicalize().unwrap_or_else(|_| {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    });
    if !root.is_dir() {
        return Err(ConfigError::NotADirectory(root));
    }
    Ok(root)
}

fn fail(error: ConfigError) -> ! {
    eprintln!("locscope: {}", error);
    process::exit(1);
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let root = resolve_root(&args.path).unwrap_or_else(|e| fail(e));
    let scanner = Scanner::new(&root, args.scan_config()).unwrap_or_else(|e| fail(e));

    let started = Instant::now();
    let tree = scanner
        .scan(&root)
        .unwrap_or_else(|| DirectoryStats::empty(root.clone()));
    tracing::info!(
        "scanned {} in {:.2?}: {} lines, {} tokens",
        root.display(),
        started.elapsed(),
        tree.total_metrics.lines,
        tree.total_metrics.tokens
    );

    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
    let tree_config = OutputConfig {
        use_color: should_use_color(args.color),
    };

    let result = match args.mode {
        Mode::Json => print_json(&tree),
        Mode::Tree => TreeFormatter::new(tree_config).print(&tree),
        Mode::Ncdu if !interactive => {
            tracing::debug!("stdin or stdout is not a terminal, printing tree");
            TreeFormatter::new(tree_config).print(&tree)
        }
        Mode::Ncdu => {
            eprintln!("Scanning complete. Opening ncdu view...");
            browser::browse_or_fallback(
                &tree,
                CrosstermTerminal::new(),
                &mut io::stdout().lock(),
                &mut io::stderr().lock(),
            )
        }
    };

    if let Err(e) = result {
        eprintln!("locscope: error writing output: {}", e);
        process::exit(1);
    }
}
