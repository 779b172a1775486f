//! Console status lines for the CLI
//!
//! Every line goes to stderr behind a colored, fixed-width prefix so stdout
//! stays clean for JSON output.

use colored::*;

const PREFIX_WIDTH: usize = 7;

fn prefix(color: Color, label: &str) -> String {
  let pad = PREFIX_WIDTH.saturating_sub(label.len() + 2);
  format!("[{}]{:pad$}", label.color(color).bold(), "")
}

fn emit(color: Color, label: &str, message: &str) {
  let prefix = prefix(color, label);
  for line in message.lines() {
    eprintln!("{prefix} {line}");
  }
}

pub fn info(message: &str) {
  emit(Color::Blue, "info", message);
}

pub fn warn(message: &str) {
  emit(Color::Yellow, "warn", message);
}

pub fn error(message: &str) {
  emit(Color::Red, "error", message);
}

pub fn success(message: &str) {
  emit(Color::Green, "sccs", message);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prefixes_share_a_width() {
    colored::control::set_override(false);
    assert_eq!(prefix(Color::Blue, "info"), "[info] ");
    assert_eq!(prefix(Color::Red, "error"), "[error]");
    colored::control::unset_override();
  }
}
