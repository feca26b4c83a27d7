//! Handles all user-facing output for the CLI.
//!
//! Colored status lines go through `termcolor`; rendered inputs are printed
//! verbatim so they can be piped into a file.

use std::io::Write;
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn print_status(color: Color, status: &str, message: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stdout, "{:>9}", status);
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {}", message);
}

/// Reports a written input file.
pub fn print_written(path: &Path, bytes: usize) {
    print_status(
        Color::Green,
        "Written",
        &format!("{} ({} bytes)", path.display(), bytes),
    );
}

/// Reports a successful validation.
pub fn print_valid(name: &str, commands: usize) {
    print_status(
        Color::Green,
        "Valid",
        &format!("input '{}' ({} commands)", name, commands),
    );
}

/// Prints one keyword per line, prefixed by its position in the line.
pub fn print_keywords(keywords: &[&str], labels: &[String]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for (index, (keyword, label)) in keywords.iter().zip(labels).enumerate() {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
        let _ = write!(stdout, "{:>4}", index);
        let _ = stdout.reset();
        let _ = writeln!(stdout, " {:<10} {}", keyword, label);
    }
}

/// Prints a rendered input as-is.
pub fn print_rendered(rendered: &str) {
    println!("{}", rendered);
}
