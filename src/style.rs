//! Terminal styling utilities
//!
//! Consistent markers for the progress lines printed during a bootstrap.
//! Uses crossterm for cross-platform terminal colors.

use crossterm::style::{StyledContent, Stylize};

/// Step completed
pub fn check() -> StyledContent<&'static str> {
    "✓".green()
}

/// Step failed
pub fn cross() -> StyledContent<&'static str> {
    "✗".red()
}

/// Step skipped or needs attention
pub fn notice() -> StyledContent<&'static str> {
    "!".yellow()
}

/// Outcome message colored by success
pub fn outcome(success: bool, message: &str) -> StyledContent<String> {
    if success {
        message.to_string().green()
    } else {
        message.to_string().red()
    }
}

/// Section headers
pub fn header(text: &str) -> StyledContent<String> {
    text.to_string().bold()
}

/// Dim/muted text
pub fn dim(text: &str) -> StyledContent<String> {
    text.to_string().dark_grey()
}

/// Repository and owner names
pub fn name(text: &str) -> StyledContent<String> {
    text.to_string().cyan()
}

/// URLs and paths
pub fn path(p: &str) -> StyledContent<String> {
    p.to_string().blue()
}
