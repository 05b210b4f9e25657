use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const SPINNER_TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        bar.set_style(style.tick_chars(SPINNER_TICKS));
    }
    bar.enable_steady_tick(Duration::from_millis(80));
    bar.set_message(message);
    bar
}

/// Numbered spinner steps, each replaced by a `✓` line when done.
pub struct StepSpinner {
    current: Option<ProgressBar>,
    run_start: Instant,
    step_start: Instant,
    step: u8,
    total_steps: u8,
}

impl StepSpinner {
    pub fn new(total_steps: u8) -> Self {
        let now = Instant::now();
        Self {
            current: None,
            run_start: now,
            step_start: now,
            step: 0,
            total_steps,
        }
    }

    fn clear(&mut self) {
        if let Some(bar) = self.current.take() {
            bar.finish_and_clear();
        }
    }

    pub fn step(&mut self, description: &str) {
        self.clear();
        self.step += 1;
        self.step_start = Instant::now();
        self.current = Some(spinner(format!(
            "[{}/{}] {description}...",
            self.step, self.total_steps
        )));
    }

    pub fn complete_step(&mut self, description: &str, substeps: &[String]) {
        self.clear();
        print_check(description, self.step_start.elapsed(), substeps);
    }

    pub fn finish(mut self) {
        self.clear();
        print_footer(self.run_start.elapsed());
    }
}

/// Step sequence for the single-molecule command; silent when not interactive.
pub enum Progress {
    Interactive(StepSpinner),
    Silent,
}

impl Progress {
    pub fn new(interactive: bool, total_steps: u8) -> Self {
        if interactive {
            Self::Interactive(StepSpinner::new(total_steps))
        } else {
            Self::Silent
        }
    }

    pub fn step(&mut self, description: &str) {
        if let Self::Interactive(s) = self {
            s.step(description);
        }
    }

    pub fn complete_step(&mut self, description: &str, substeps: &[String]) {
        if let Self::Interactive(s) = self {
            s.complete_step(description, substeps);
        }
    }

    pub fn finish(self) {
        if let Self::Interactive(s) = self {
            s.finish();
        }
    }
}

/// Row counter for the batch command.
///
/// Row failures are always printed to stderr, one line each; when a bar is
/// on screen it is suspended so the line does not tear it.
pub struct RowProgress {
    bar: Option<ProgressBar>,
    interactive: bool,
    start: Instant,
}

impl RowProgress {
    pub fn new(interactive: bool) -> Self {
        let bar = interactive.then(|| {
            let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
            if let Ok(style) = ProgressStyle::default_bar()
                .template("  {spinner:.cyan} [{bar:36.cyan/blue}] {pos}/{len} rows {msg} ({eta})")
            {
                bar.set_style(style.tick_chars(SPINNER_TICKS).progress_chars("━╸ "));
            }
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });

        Self {
            bar,
            interactive,
            start: Instant::now(),
        }
    }

    pub fn set_rows(&self, rows: usize, workers: usize) {
        if let Some(bar) = &self.bar {
            bar.set_length(rows as u64);
            bar.set_message(format!("on {workers} workers"));
        }
    }

    pub fn row_done(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// Prints a `✗` line above the bar; colour only on a terminal.
    pub fn report(&self, line: &str) {
        let text = failure_line(line, self.interactive);
        let print = || {
            let _ = writeln!(io::stderr().lock(), "{text}");
        };
        match &self.bar {
            Some(bar) => bar.suspend(print),
            None => print(),
        }
    }

    /// Clears the bar and prints the `✓` line for the whole run.
    pub fn complete(&mut self, description: &str, substeps: &[String]) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
            print_check(description, self.start.elapsed(), substeps);
        }
    }

    pub fn finish(self) {
        if self.interactive {
            print_footer(self.start.elapsed());
        }
    }
}

fn failure_line(line: &str, colored: bool) -> String {
    if colored {
        format!("  \x1b[31m✗\x1b[0m {line}")
    } else {
        format!("  ✗ {line}")
    }
}

fn print_check(description: &str, elapsed: Duration, substeps: &[String]) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(
        stderr,
        "  \x1b[32m✓\x1b[0m {:<44} {:>5.1}s",
        description,
        elapsed.as_secs_f64()
    );
    for substep in substeps {
        let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {}", substep);
    }
}

fn print_footer(elapsed: Duration) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(
        stderr,
        "  \x1b[2m╺━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╸\x1b[0m"
    );
    let _ = writeln!(stderr);
    let _ = writeln!(
        stderr,
        "  \x1b[32m✓\x1b[0m Descriptors complete {:>29}",
        format!("Total: {:.2}s", elapsed.as_secs_f64())
    );
    let _ = writeln!(stderr);
}
