//! Terminal output for the `clientbook-server` subcommands.
//!
//! Every line has a colored form and a plain form. The plain form uses
//! bracketed tags so it stays readable in logs and CI.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Writes status lines for `init` and `config`.
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Picks the colored or plain rendering of a line.
    fn pick(&self, colored: impl FnOnce() -> String, plain: impl FnOnce() -> String) -> String {
        if self.colored {
            colored()
        } else {
            plain()
        }
    }

    /// A marker followed by a message, e.g. `✓ done` or `[OK] done`.
    fn status(&self, mark: impl Display, tag: &str, message: impl Display) -> String {
        self.pick(
            || format!("  {} {}", mark, message),
            || format!("  [{}] {}", tag, message),
        )
    }

    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        let line = self.pick(
            || format!("{} {}", "clientbook".bright_cyan().bold(), version.dimmed()),
            || format!("clientbook {}", version),
        );
        println!("\n   {}\n", line);
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.status("✓".green().bold(), "OK", message.green()));
    }

    pub fn info(&self, message: &str) {
        println!("{}", self.status("•".blue(), "INFO", message));
    }

    pub fn warning(&self, message: &str) {
        println!("{}", self.status("⚠".yellow().bold(), "WARN", message.yellow()));
    }

    /// Goes to stderr.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.status("✗".red().bold(), "ERROR", message.red()));
    }

    /// A file or directory written by `init`.
    pub fn created(&self, kind: &str, path: &str) {
        let line = self.pick(
            || format!("  {} {} {}", "✓".green().bold(), kind.dimmed(), path.bright_white()),
            || format!("  [CREATED] {} {}", kind, path),
        );
        println!("{}", line);
    }

    /// A path `init` left alone.
    pub fn skipped(&self, path: &str, reason: &str) {
        let reason = format!("({})", reason);
        let line = self.pick(
            || format!("  {} {} {}", "○".yellow(), path.dimmed(), reason.yellow()),
            || format!("  [SKIPPED] {} {}", path, reason),
        );
        println!("{}", line);
    }

    pub fn header(&self, title: &str) {
        let line = self.pick(
            || title.bright_white().bold().underline().to_string(),
            || format!("=== {} ===", title),
        );
        println!("\n  {}", line);
    }

    /// An indented `key: value` row, used by `config`.
    pub fn kv(&self, key: &str, value: &str) {
        let line = self.pick(
            || format!("{}: {}", key.dimmed(), value.bright_white()),
            || format!("{}: {}", key, value),
        );
        println!("    {}", line);
    }

    pub fn hint(&self, message: &str) {
        let line = self.pick(
            || message.dimmed().italic().to_string(),
            || format!("[TIP] {}", message),
        );
        println!("\n  {}", line);
    }

    /// A shell command the user should run next.
    pub fn command(&self, cmd: &str) {
        let cmd = format!("$ {}", cmd);
        let line = self.pick(|| cmd.bright_cyan().to_string(), || cmd.clone());
        println!("     {}", line);
    }

    pub fn newline(&self) {
        println!();
    }
}
