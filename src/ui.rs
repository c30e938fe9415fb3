//! Terminal-aware console output
//!
//! Decorative lines (labels, warnings, banners) are printed only when stdout
//! is attached to an interactive terminal, so non-interactive invocations get
//! clean machine-usable output on the standard channels. Error messages go to
//! stderr regardless of terminal status.

use console::Term;
use owo_colors::OwoColorize;

/// Console output helper
pub struct UI {
    term: Term,
}

impl UI {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// True when stdout is attached to an interactive terminal
    pub fn is_interactive(&self) -> bool {
        self.term.is_term()
    }

    /// Helper method to conditionally apply color based on terminal support
    fn colorize<F>(&self, text: &str, color_fn: F) -> String
    where
        F: FnOnce(&str) -> String,
    {
        if self.supports_color() {
            color_fn(text)
        } else {
            text.to_string()
        }
    }

    /// Print a bold underlined label (interactive terminals only)
    pub fn label(&self, message: &str) {
        if !self.is_interactive() {
            return;
        }
        let output = self.colorize(message, |m| m.bold().underline().to_string());
        println!("{}", output);
    }

    /// Print a warning message (interactive terminals only)
    pub fn warning(&self, message: &str) {
        if !self.is_interactive() {
            return;
        }
        let output = self.colorize(message, |m| m.yellow().bold().to_string());
        println!("{}", output);
    }

    /// Print a high-visibility warning (interactive terminals only)
    pub fn danger(&self, message: &str) {
        if !self.is_interactive() {
            return;
        }
        let output = self.colorize(message, |m| m.red().bold().italic().to_string());
        println!("{}", output);
    }

    /// Print machine-usable output, regardless of terminal status
    pub fn plain(&self, message: &str) {
        println!("{}", message);
    }

    /// Print an error message to stderr (color only if supported)
    pub fn error(&self, message: &str) {
        let output = self.colorize(message, |m| m.red().bold().to_string());
        eprintln!("{}", output);
    }

    /// Check if terminal supports color
    fn supports_color(&self) -> bool {
        self.term.features().colors_supported()
    }
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}
