//! Console message styling.
//!
//! Stateless helpers: each takes a message and returns the decorated text.
//! ANSI colours are only used when stdout is a terminal and `NO_COLOR` is unset.

use std::io::IsTerminal;

const GREEN: &str = "\x1b[92m";
const YELLOW: &str = "\x1b[93m";
const RED: &str = "\x1b[91m";
const BLUE: &str = "\x1b[94m";
const CYAN: &str = "\x1b[96m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

fn paint(codes: &[&str], text: &str) -> String {
    if colors_enabled() {
        format!("{}{}{}", codes.concat(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Section heading: `==> msg`.
pub fn step(msg: &str) -> String {
    format!("\n{} {}", paint(&[BLUE, BOLD], "==>"), msg)
}

pub fn success(msg: &str) -> String {
    format!("{} {}", paint(&[GREEN], "✓"), msg)
}

pub fn warning(msg: &str) -> String {
    format!("{} {}", paint(&[YELLOW], "⚠"), msg)
}

pub fn error(msg: &str) -> String {
    format!("{} {}", paint(&[RED], "✗"), msg)
}

pub fn bold(msg: &str) -> String {
    paint(&[BOLD], msg)
}

/// Bold green block used for the final summary banner.
pub fn highlight(msg: &str) -> String {
    paint(&[GREEN, BOLD], msg)
}

/// Start-up banner.
pub fn banner() -> String {
    let logo = "\n ╦  ╦╔═╗╔╦╗╔═╗╦ ╦╦  ╦\n ║  ║╚═╗ ║ ╠═╝║ ║║  ║\n ╩═╝╩╚═╝ ╩ ╩  ╚═╝╩═╝╩═╝\n";
    format!(
        "{}\n{}\n",
        paint(&[CYAN, BOLD], logo),
        bold("   Self-Hosted Deployment Script")
    )
}
