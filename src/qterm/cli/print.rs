use super::styles::Palette;
use colored::Colorize;
use console::Term;
use qterm::surface::{DisplaySink, OutputKind};

const BANNER: &[&str] = &[
    "Welcome to Quantum Terminal",
    "Type 'help' to begin your quantum optics journey.",
    "Search papers with 'arxiv <query> [n]' or 'latest_quant'. 'exit' leaves.",
];

/// The real terminal as a [`DisplaySink`].
pub struct TerminalDisplay {
    term: Term,
}

impl TerminalDisplay {
    pub fn stdout() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl DisplaySink for TerminalDisplay {
    fn show(&mut self, text: &str, kind: OutputKind) {
        let line = match kind {
            OutputKind::Output => text.to_string(),
            OutputKind::Error => text.red().to_string(),
        };
        if let Err(err) = self.term.write_line(&line) {
            tracing::warn!(error = %err, "failed to write to terminal");
        }
    }

    fn clear(&mut self) {
        if let Err(err) = self.term.clear_screen() {
            tracing::warn!(error = %err, "failed to clear terminal");
        }
    }
}

pub(super) fn print_banner(palette: &Palette) {
    let style = palette.primary();
    for (i, line) in BANNER.iter().enumerate() {
        if i == 0 {
            println!("{}", style.clone().bold().apply_to(line));
        } else {
            println!("{}", style.apply_to(line));
        }
    }
    println!();
}

pub(super) fn print_cancelled() {
    println!("{}", "Request cancelled.".yellow());
}
