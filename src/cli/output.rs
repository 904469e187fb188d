//! Handles all user-facing output for the CLI.
//!
//! Colour is applied with `termcolor` and disabled automatically when stdout
//! is not a terminal.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Prints `code = template` lines, codes highlighted.
pub fn print_codes(entries: &[(&str, &str)]) {
    if entries.is_empty() {
        println!("  No messages found.");
        return;
    }

    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let width = entries.iter().map(|(code, _)| code.len()).max().unwrap_or(0);
    for (code, template) in entries {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
        let _ = write!(stdout, "{code:<width$}");
        let _ = stdout.reset();
        let _ = writeln!(stdout, " = {template}");
    }
}

/// Prints a single pass/fail line of `nestmsg check`.
pub fn print_check(code: &str, ok: bool) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let (mark, color) = if ok { ("✓", Color::Green) } else { ("✗", Color::Red) };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)));
    let _ = write!(stdout, "{mark}");
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {code}");
}

/// Prints the closing summary of `nestmsg check`.
pub fn print_summary(passed: usize, failed: usize) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let total = passed + failed;

    let _ = stdout.set_color(ColorSpec::new().set_bold(true));
    let _ = writeln!(stdout, "\nCheck Summary");
    let _ = stdout.reset();
    let _ = writeln!(stdout, "═════════════");

    if passed > 0 {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
        let _ = writeln!(stdout, "✓ Passed: {passed} messages");
    }
    if failed > 0 {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
        let _ = writeln!(stdout, "✗ Failed: {failed} messages");
    }
    let _ = stdout.reset();

    let rate = if total > 0 {
        (passed as f64 / total as f64) * 100.0
    } else {
        0.0
    };
    let _ = writeln!(stdout, "Success rate: {rate:.1}% ({passed}/{total})");
}
