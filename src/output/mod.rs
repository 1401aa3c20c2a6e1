//! Tree formatting and display
//!
//! - `config` - Output configuration types
//! - `utils` - Number, size and metric formatting shared with the browser
//! - `tree` - Indented tree formatter
//! - `json` - JSON output

mod config;
mod json;
mod tree;
mod utils;

pub use config::OutputConfig;
pub use json::{print_json, to_json};
pub use tree::TreeFormatter;
pub use utils::{
    ellipsize, fit_to_width, format_file_description, format_metrics, format_number, format_size,
    scaled_bar,
};
