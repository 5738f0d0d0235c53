// ============================================================================
// sonovid-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: UI Components and Styling
//
// User-facing output of the CLI: section headers, key-value status lines,
// success/warning/error lines and the conversion progress bar. Log records
// go to stderr through the logger; everything here goes to stdout, except
// errors.
//
// KEY COMPONENTS:
// - styling: Constants for symbols and formatting
// - print_section, print_status, print_success, print_warning, print_error
// - ConversionProgress: indicatif bar that can print lines above itself

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

// ============================================================================
// STYLING CONSTANTS
// ============================================================================

/// Styling constants for terminal output
pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const WARNING_SYMBOL: &str = "!";
    pub const ERROR_SYMBOL: &str = "✗";
    pub const CANCEL_SYMBOL: &str = "⊘";

    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";

    pub const STATUS_INDENT: &str = "  ";
    pub const LABEL_WIDTH: usize = 15;

    pub const PROGRESS_TEMPLATE: &str =
        "  {spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}";
    pub const PROGRESS_CHARS: &str = "#>-";
}

// ============================================================================
// TERMINAL COMPONENTS
// ============================================================================

/// Print a section header for major workflow phases
pub fn print_section(title: &str) {
    println!();
    println!(
        "{}{}{}",
        styling::SECTION_PREFIX,
        style(title.to_uppercase()).cyan().bold(),
        styling::SECTION_SUFFIX
    );
}

/// Formats a key-value status line with an aligned label.
#[must_use]
pub fn format_status(label: &str, value: &str) -> String {
    let padding = styling::LABEL_WIDTH.saturating_sub(label.len()).max(1);
    format!("{}{}:{}{}", styling::STATUS_INDENT, label, " ".repeat(padding), value)
}

/// Print a status line (key-value pair)
///
/// # Arguments
///
/// * `label` - The label for the status line
/// * `value` - The value to display
/// * `highlight` - Whether to emphasize the value
pub fn print_status(label: &str, value: &str, highlight: bool) {
    if highlight {
        println!("{}", format_status(label, &style(value).bold().to_string()));
    } else {
        println!("{}", format_status(label, value));
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!(
        "{}{} {}",
        styling::STATUS_INDENT,
        styling::SUCCESS_SYMBOL,
        style(message).green()
    );
}

/// Print a cancellation notice, distinct from both success and failure
pub fn print_cancelled(message: &str) {
    println!(
        "{}{} {}",
        styling::STATUS_INDENT,
        styling::CANCEL_SYMBOL,
        style(message).yellow().bold()
    );
}

/// Print a warning line
pub fn print_warning(message: &str) {
    println!(
        "{}{} {}",
        styling::STATUS_INDENT,
        style(styling::WARNING_SYMBOL).yellow().bold(),
        style(message).yellow()
    );
}

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!(
        "{} {}",
        styling::ERROR_SYMBOL,
        style(format!("Error: {message}")).red().bold()
    );
}

// ============================================================================
// PROGRESS BAR
// ============================================================================

/// Progress bar for one conversion, in percent.
pub struct ConversionProgress {
    bar: ProgressBar,
}

impl ConversionProgress {
    #[must_use]
    pub fn new(label: &str) -> Self {
        let bar = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stdout());
        let bar_style = ProgressStyle::with_template(styling::PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(styling::PROGRESS_CHARS);
        bar.set_style(bar_style);
        bar.set_message(label.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        Self { bar }
    }

    /// Moves the bar. Regressions are shown as-is.
    pub fn set_percent(&self, percent: u8) {
        self.bar.set_position(u64::from(percent.min(100)));
    }

    /// Prints a line above the bar without corrupting it.
    pub fn println(&self, line: &str) {
        self.bar.println(format!("{}{}", styling::STATUS_INDENT, style(line).dim()));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
