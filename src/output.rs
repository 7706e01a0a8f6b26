//! # Output Configuration
//!
//! This module controls how repoweave prints: whether colors are used, and
//! the small set of styled blocks every command is built from.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Styled blocks
//!
//! Per-repository output is produced as one `String` per repository and
//! printed with a single `println!`, so output from concurrent workers never
//! interleaves inside a block.
//!
//! ```
//! use repoweave::output;
//!
//! let block = output::repo_entry("src/demos", "## main...origin/main");
//! assert!(block.contains("=== src/demos ==="));
//! ```

use std::env;
use std::fmt::Display;

use console::style;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Makes this configuration the process-wide one for `console` styling.
    ///
    /// Git output is colorized separately, by passing [`Self::use_color`] to
    /// the `git` wrappers.
    pub fn apply(&self) {
        console::set_colors_enabled(self.use_color);
        console::set_colors_enabled_stderr(self.use_color);
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// A repository header followed by command output.
pub fn repo_entry(path: impl Display, body: &str) -> String {
    let header = style(format!("=== {} ===", path)).blue().bold();
    let body = body.trim_end();
    if body.is_empty() {
        header.to_string()
    } else {
        format!("{}\n{}", header, body)
    }
}

/// A section title.
pub fn section(title: impl Display) -> String {
    style(title).green().bold().to_string()
}

pub fn separator() -> String {
    style("--------------------").magenta().to_string()
}

pub fn warning(message: impl Display) -> String {
    style(message).yellow().to_string()
}

pub fn error(message: impl Display) -> String {
    style(message).red().to_string()
}

pub fn success(message: impl Display) -> String {
    style(message).green().to_string()
}
