//! Error handling utilities for the CLI.

use xpr::{ParserError, RenderConfig, render_error_to};

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, ParserError>;

/// Render an error to stderr.
pub fn render(error: &ParserError, no_color: bool) {
    let config = RenderConfig {
        color: !no_color,
        ..Default::default()
    };
    render_error_to(error, &mut std::io::stderr(), &config).ok();
}
