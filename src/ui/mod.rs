//! User interface module.
//!
//! mex-release never prompts; it reports. `formatter` holds the output
//! helpers, re-exported here for convenience.

pub mod formatter;

pub use formatter::{
    display_command, display_error, display_output, display_status, display_success,
    display_warning, format_command_line,
};

/// Print the closing line of a successful release.
pub fn display_released(version: &str) {
    println!(
        "\n{} Released version {}\n",
        console::style("✓").green().bold(),
        console::style(version).bold()
    );
}
