use super::complete::CommandCompleter;
use super::print::{print_banner, print_cancelled, TerminalDisplay};
use super::styles::Palette;
use qterm::commands::build_registry;
use qterm::dispatch::{Dispatcher, Outcome};
use qterm::error::{QtermError, Result};
use qterm::render::{render, TerminalMarkup};
use qterm::services::Services;
use qterm::surface::{DisplaySink, OutputKind};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Editor};
use std::path::Path;

const HISTORY_FILENAME: &str = "history.txt";
const MAX_HISTORY: usize = 500;

fn editor_error(err: ReadlineError) -> QtermError {
    QtermError::Io(std::io::Error::other(err.to_string()))
}

/// The interactive loop. One line is read, dispatched, and rendered before
/// the next prompt appears; Ctrl-C during a request abandons it.
pub async fn run_shell(services: &Services, palette: Palette, color: bool, data_dir: &Path) -> Result<()> {
    let registry = build_registry()?;
    let mut dispatcher = Dispatcher::new(&registry, services);
    let mut display = TerminalDisplay::stdout();
    let mut palette = palette;

    let config = rustyline::Config::builder()
        .max_history_size(MAX_HISTORY)
        .map_err(editor_error)?
        .completion_type(CompletionType::List)
        .auto_add_history(true)
        .build();
    let mut editor: Editor<CommandCompleter, DefaultHistory> =
        Editor::with_config(config).map_err(editor_error)?;
    editor.set_helper(Some(CommandCompleter::new(&registry)));

    let history_path = data_dir.join(HISTORY_FILENAME);
    let _ = editor.load_history(&history_path);

    print_banner(&palette);

    loop {
        let line = match editor.readline(&palette.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(editor_error(err)),
        };
        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }

        let outcome = tokio::select! {
            outcome = dispatcher.dispatch(line, &mut display, &mut palette) => Some(outcome),
            _ = tokio::signal::ctrl_c() => None,
        };

        match outcome {
            Some(outcome) => show_outcome(&outcome, &palette, color, &mut display),
            None => {
                tracing::info!(line, "request cancelled");
                print_cancelled();
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(err) = editor.save_history(&history_path) {
        tracing::warn!(error = %err, "could not save history");
    }
    Ok(())
}

fn show_outcome(outcome: &Outcome, palette: &Palette, color: bool, display: &mut dyn DisplaySink) {
    let Some((text, kind)) = outcome.display_text() else {
        return;
    };
    let markup = match kind {
        OutputKind::Output => TerminalMarkup::new(color).with_plain_style(palette.primary()),
        _ => TerminalMarkup::new(color),
    };
    display.show(&render(&text, &markup), kind);
}
