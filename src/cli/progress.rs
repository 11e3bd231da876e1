//! Progress bar utilities for CLI output
//!
//! Progress tracking for the directory scans plus small console output
//! helpers used by the command handlers. Bars suspend cleanly when a
//! message has to be printed mid-scan.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Get the spinner style for scanning operations
fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap()
        .tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷")
}

// ============================================================================
// Console output helpers
// ============================================================================

/// Print a header section with a box
pub fn print_header(title: &str) {
    let width = 68;
    let title_padded = format!("{:^width$}", title, width = width - 4);
    println!();
    println!("╔{}╗", "═".repeat(width - 2));
    println!("║{}║", title_padded);
    println!("╚{}╝", "═".repeat(width - 2));
    println!();
}

/// Print a success message with checkmark
pub fn print_success(msg: &str) {
    println!("  ✓ {}", msg);
}

/// Print an info message with bullet
pub fn print_info(msg: &str) {
    println!("  • {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("  ⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    println!("  ✗ {}", msg);
}

// ============================================================================
// Progress tracker for directory scans
// ============================================================================

/// Spinner-based progress tracker for walk-and-process operations
pub struct ScanProgress {
    files_processed: AtomicUsize,
    spinner: ProgressBar,
    start_time: Instant,
    label: String,
}

impl ScanProgress {
    /// Create a tracker; `label` names the operation, e.g. "Hashing"
    pub fn new(label: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(format!("{}...", label));

        Self {
            files_processed: AtomicUsize::new(0),
            spinner,
            start_time: Instant::now(),
            label: label.to_string(),
        }
    }

    /// Count one processed file
    pub fn tick_file(&self) {
        let files = self.files_processed.fetch_add(1, Ordering::Relaxed) + 1;
        let elapsed = self.start_time.elapsed().as_secs();
        self.spinner.set_message(format!(
            "{}: {} files ({:.0}s)",
            self.label, files, elapsed
        ));
    }

    /// Log a message while suspending the progress display
    pub fn log(&self, msg: &str) {
        self.spinner.suspend(|| {
            println!("  {}", msg);
        });
    }

    /// Finish the progress display with a summary
    pub fn finish(&self, summary: &str) {
        let elapsed = self.start_time.elapsed();
        self.spinner.finish_with_message(format!(
            "✓ {} ({:.1}s)",
            summary,
            elapsed.as_secs_f64()
        ));
    }
}

// ============================================================================
// Dual writer for file + console logging
// ============================================================================

/// A writer that writes to both console and file
///
/// Used for logging to both stderr and a log file simultaneously.
pub struct DualWriter {
    pub console: std::io::Stderr,
    pub file: std::fs::File,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        // Write to console
        let _ = self.console.write(buf);
        // Write to file
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let _ = self.console.flush();
        self.file.flush()
    }
}
