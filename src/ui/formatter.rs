//! Pure formatting functions for UI output.
//!
//! Everything the user sees goes through here so the releaser, the command
//! runner and the CLI share one look.

use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a non-fatal warning.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Echo a command line before it is executed.
pub fn display_command(command_line: &str) {
    println!("{}", style(command_line).cyan());
}

/// Echo captured command output. Blank output prints nothing.
pub fn display_output(output: &str) {
    let trimmed = output.trim_end();
    if !trimmed.trim().is_empty() {
        println!("{}", trimmed);
    }
}

/// Render a program and its arguments as a single shell-like line.
///
/// Arguments containing whitespace or quotes are wrapped in double quotes so
/// the echoed line reads unambiguously, e.g. `git commit -m "bump version to 1.2.4"`.
pub fn format_command_line(program: &str, args: &[&str]) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(program.to_string());
    for arg in args {
        if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"') {
            parts.push(format!("\"{}\"", arg.replace('"', "\\\"")));
        } else {
            parts.push((*arg).to_string());
        }
    }
    parts.join(" ")
}
