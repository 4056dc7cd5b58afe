//! Styled console output for iontools
//!
//! Progress and results go to stdout. Warnings and errors go to stderr so a
//! command streaming data on stdout (`tabs`) stays clean.

use console::style;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    /// Create a new output handler
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        // Errors are always shown, even in quiet mode
        eprintln!("{} {}", style("✖").red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print a warning on stderr even in quiet mode
    pub fn notice(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow(), message);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    /// Print a header/title
    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Print a step in a process
    pub fn step(&self, step: &str) {
        if !self.quiet {
            println!("{} {}", style("❯").cyan(), step);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if !self.quiet {
            println!("  • {item}");
        }
    }

    /// Print raw captured text, indented
    pub fn block(&self, text: &str) {
        if !self.quiet {
            for line in text.lines() {
                println!("    {line}");
            }
        }
    }

    /// Print an action result with consistent styling
    pub fn action_result(&self, action: &str, result: &str, success: bool) {
        if !self.quiet {
            let styled_icon = if success {
                style("✓").green().bold()
            } else {
                style("✗").red().bold()
            };
            println!("{} {} {}", styled_icon, style(action).bold(), style(result).dim());
        }
    }

    /// Print summary statistics with enhanced styling
    pub fn summary_stats(&self, label: &str, value: usize) {
        if !self.quiet {
            println!("  {} {}", style(label).dim(), style(value.to_string()).bold());
        }
    }
}
