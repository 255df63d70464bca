//! # Command Dispatcher
//!
//! Resolves one submitted line against the registry and runs its handler.
//!
//! The dispatcher is `Idle` until a known command is submitted, `Executing`
//! while that command's handler is pending, and `Idle` again once it settles,
//! whatever the outcome. [`Dispatcher::dispatch`] holds `&mut self` across
//! the await, so a second execution cannot start while one is in flight.

use crate::commands::CommandContext;
use crate::registry::CommandRegistry;
use crate::render::{render, Markup};
use crate::services::Services;
use crate::surface::{DisplaySink, OutputKind, ThemeSink};

pub const NOT_FOUND_MESSAGE: &str = "Command not found. Type 'help' for options.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Executing,
}

/// One submitted line, split into command and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub raw: &'a str,
    pub command: &'a str,
    pub args: Vec<String>,
}

impl<'a> Invocation<'a> {
    /// `None` for blank input.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let mut tokens = raw.split_whitespace();
        let command = tokens.next()?;
        Some(Self {
            raw,
            command,
            args: tokens.map(str::to_string).collect(),
        })
    }
}

/// How a submission settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Blank input; nothing happened
    Ignored,
    NotFound(String),
    /// The handler ran and produced no text
    Empty,
    Output(String),
    /// The handler returned an error
    Failed(String),
}

impl Outcome {
    /// The raw text to render for this outcome, if any.
    pub fn display_text(&self) -> Option<(String, OutputKind)> {
        match self {
            Outcome::Ignored | Outcome::Empty => None,
            Outcome::NotFound(_) => Some((NOT_FOUND_MESSAGE.to_string(), OutputKind::Error)),
            Outcome::Output(text) => Some((text.clone(), OutputKind::Output)),
            Outcome::Failed(message) => Some((format!("Error: {}", message), OutputKind::Error)),
        }
    }
}

/// Marks the dispatcher busy until dropped, including when the pending
/// future is cancelled.
struct Executing<'s>(&'s mut DispatchState);

impl<'s> Executing<'s> {
    fn enter(state: &'s mut DispatchState) -> Self {
        *state = DispatchState::Executing;
        Self(state)
    }
}

impl Drop for Executing<'_> {
    fn drop(&mut self) {
        *self.0 = DispatchState::Idle;
    }
}

pub struct Dispatcher<'r> {
    registry: &'r CommandRegistry,
    services: &'r Services,
    state: DispatchState,
}

impl<'r> Dispatcher<'r> {
    pub fn new(registry: &'r CommandRegistry, services: &'r Services) -> Self {
        Self {
            registry,
            services,
            state: DispatchState::Idle,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn registry(&self) -> &'r CommandRegistry {
        self.registry
    }

    /// Resolves and runs `line`, returning how it settled.
    pub async fn dispatch(
        &mut self,
        line: &str,
        display: &mut dyn DisplaySink,
        theme: &mut dyn ThemeSink,
    ) -> Outcome {
        let Some(invocation) = Invocation::parse(line) else {
            return Outcome::Ignored;
        };

        let command = match self.registry.lookup(invocation.command) {
            Ok(command) => command,
            Err(err) => {
                tracing::debug!(error = %err, "unknown command");
                return Outcome::NotFound(invocation.command.to_string());
            }
        };

        tracing::debug!(command = command.name(), args = ?invocation.args, "executing");
        let mut ctx = CommandContext {
            registry: self.registry,
            services: self.services,
            display,
            theme,
        };
        let executing = Executing::enter(&mut self.state);
        let result = command.handler().execute(&mut ctx, invocation.args).await;
        drop(executing);

        match result {
            Ok(text) if text.is_empty() => Outcome::Empty,
            Ok(text) => Outcome::Output(text),
            Err(err) => {
                tracing::warn!(command = command.name(), error = %err, "command failed");
                Outcome::Failed(err.to_string())
            }
        }
    }

    /// Dispatches `line`, then renders and shows whatever it produced.
    pub async fn submit(
        &mut self,
        line: &str,
        markup: &dyn Markup,
        display: &mut dyn DisplaySink,
        theme: &mut dyn ThemeSink,
    ) -> Outcome {
        let outcome = self.dispatch(line, display, theme).await;
        if let Some((text, kind)) = outcome.display_text() {
            display.show(&render(&text, markup), kind);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{Echo, Fail, Reply};
    use crate::commands::CommandHandler;
    use crate::config::QtermConfig;
    use crate::error::Result;
    use crate::render::TerminalMarkup;
    use crate::services::http::stub::StubClient;
    use crate::surface::recording::{RecordingDisplay, RecordingTheme};
    use async_trait::async_trait;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counting(Rc<Cell<usize>>);

    #[async_trait(?Send)]
    impl CommandHandler for Counting {
        async fn execute(&self, _ctx: &mut CommandContext<'_>, _args: Vec<String>) -> Result<String> {
            self.0.set(self.0.get() + 1);
            Ok("counted".into())
        }
    }

    struct Hang;

    #[async_trait(?Send)]
    impl CommandHandler for Hang {
        async fn execute(&self, _ctx: &mut CommandContext<'_>, _args: Vec<String>) -> Result<String> {
            std::future::pending::<()>().await;
            Ok(String::new())
        }
    }

    struct Fixture {
        registry: CommandRegistry,
        services: Services,
        calls: Rc<Cell<usize>>,
    }

    fn fixture() -> Fixture {
        let calls = Rc::new(Cell::new(0));
        let mut registry = CommandRegistry::new();
        registry.register("count", "counts calls", Counting(calls.clone())).unwrap();
        registry.register("echo", "echoes args", Echo).unwrap();
        registry.register("silent", "returns nothing", Reply("")).unwrap();
        registry.register("boom", "always fails", Fail("kaboom")).unwrap();
        registry.register("hang", "never settles", Hang).unwrap();
        registry
            .register("doi", "prints a doi", Reply("See 10.1103/PhysRevLett.1.1 and $$\\hbar$$"))
            .unwrap();

        let services = Services::new(Rc::new(StubClient::new()), &QtermConfig::default());
        Fixture {
            registry,
            services,
            calls,
        }
    }

    #[test]
    fn invocation_splits_on_whitespace() {
        let inv = Invocation::parse("  arxiv   cavity\tqed  10 ").unwrap();
        assert_eq!(inv.command, "arxiv");
        assert_eq!(inv.args, vec!["cavity", "qed", "10"]);
        assert!(Invocation::parse("   ").is_none());
    }

    #[tokio::test]
    async fn unknown_command_invokes_nothing() {
        let f = fixture();
        let mut dispatcher = Dispatcher::new(&f.registry, &f.services);
        let mut display = RecordingDisplay::default();
        let mut theme = RecordingTheme::default();

        let outcome = dispatcher
            .submit("teleport alice", &TerminalMarkup::new(false), &mut display, &mut theme)
            .await;

        assert_eq!(outcome, Outcome::NotFound("teleport".into()));
        assert_eq!(f.calls.get(), 0);
        assert_eq!(
            display.blocks,
            vec![(NOT_FOUND_MESSAGE.to_string(), OutputKind::Error)]
        );
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[tokio::test]
    async fn known_command_runs_once_and_returns_to_idle() {
        let f = fixture();
        let mut dispatcher = Dispatcher::new(&f.registry, &f.services);
        let mut display = RecordingDisplay::default();
        let mut theme = RecordingTheme::default();

        let outcome = dispatcher.dispatch("count", &mut display, &mut theme).await;
        assert_eq!(outcome, Outcome::Output("counted".into()));
        assert_eq!(f.calls.get(), 1);
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[tokio::test]
    async fn arguments_reach_the_handler() {
        let f = fixture();
        let mut dispatcher = Dispatcher::new(&f.registry, &f.services);
        let mut display = RecordingDisplay::default();
        let mut theme = RecordingTheme::default();

        let outcome = dispatcher.dispatch("echo a  b c", &mut display, &mut theme).await;
        assert_eq!(outcome, Outcome::Output("a|b|c".into()));
    }

    #[tokio::test]
    async fn blank_and_empty_results_show_nothing() {
        let f = fixture();
        let mut dispatcher = Dispatcher::new(&f.registry, &f.services);
        let mut display = RecordingDisplay::default();
        let mut theme = RecordingTheme::default();
        let markup = TerminalMarkup::new(false);

        assert_eq!(
            dispatcher.submit("   ", &markup, &mut display, &mut theme).await,
            Outcome::Ignored
        );
        assert_eq!(
            dispatcher.submit("silent", &markup, &mut display, &mut theme).await,
            Outcome::Empty
        );
        assert!(display.blocks.is_empty());
    }

    #[tokio::test]
    async fn handler_errors_are_caught_and_rendered() {
        let f = fixture();
        let mut dispatcher = Dispatcher::new(&f.registry, &f.services);
        let mut display = RecordingDisplay::default();
        let mut theme = RecordingTheme::default();

        let outcome = dispatcher
            .submit("boom", &TerminalMarkup::new(false), &mut display, &mut theme)
            .await;
        assert!(matches!(outcome, Outcome::Failed(_)));
        let (text, kind) = &display.blocks[0];
        assert_eq!(*kind, OutputKind::Error);
        assert_eq!(text, "Error: Config error: kaboom");
        assert_eq!(dispatcher.state(), DispatchState::Idle);

        // the terminal stays usable
        let next = dispatcher.dispatch("count", &mut display, &mut theme).await;
        assert_eq!(next, Outcome::Output("counted".into()));
    }

    #[tokio::test]
    async fn cancelled_execution_returns_to_idle() {
        let f = fixture();
        let mut dispatcher = Dispatcher::new(&f.registry, &f.services);
        let mut display = RecordingDisplay::default();
        let mut theme = RecordingTheme::default();

        let pending = dispatcher.dispatch("hang", &mut display, &mut theme);
        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(20), pending).await;
        assert!(timed_out.is_err());
        assert_eq!(dispatcher.state(), DispatchState::Idle);

        let next = dispatcher.dispatch("count", &mut display, &mut theme).await;
        assert_eq!(next, Outcome::Output("counted".into()));
    }

    #[tokio::test]
    async fn output_goes_through_the_renderer() {
        let f = fixture();
        let mut dispatcher = Dispatcher::new(&f.registry, &f.services);
        let mut display = RecordingDisplay::default();
        let mut theme = RecordingTheme::default();

        dispatcher
            .submit("doi", &TerminalMarkup::new(false), &mut display, &mut theme)
            .await;
        assert_eq!(
            display.blocks[0].0,
            "See 10.1103/PhysRevLett.1.1 <https://doi.org/10.1103/PhysRevLett.1.1> and ħ"
        );
    }
}
