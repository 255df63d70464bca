//! Terminal commands.
//!
//! Each command is a [`CommandHandler`]: it receives the argument tokens and a
//! [`CommandContext`] carrying the services and display capabilities, and
//! returns the raw text to render. Network failures are turned into text by
//! the services themselves; an `Err` here means something the dispatcher
//! should report as a generic error.

use crate::error::Result;
use crate::registry::CommandRegistry;
use crate::services::Services;
use crate::surface::{DisplaySink, ThemeSink};
use async_trait::async_trait;

pub mod papers;
pub mod system;
pub mod tutor;

pub struct CommandContext<'a> {
    pub registry: &'a CommandRegistry,
    pub services: &'a Services,
    pub display: &'a mut dyn DisplaySink,
    pub theme: &'a mut dyn ThemeSink,
}

#[async_trait(?Send)]
pub trait CommandHandler {
    async fn execute(&self, ctx: &mut CommandContext<'_>, args: Vec<String>) -> Result<String>;
}

/// Builds the registry with every built-in command, in help order.
pub fn build_registry() -> Result<CommandRegistry> {
    let mut registry = CommandRegistry::new();

    registry.register("help", "Show all available commands", system::Help)?;

    for kind in tutor::TutorKind::all() {
        registry.register(kind.name(), kind.description(), tutor::TutorCommand(*kind))?;
    }

    registry.register(
        "arxiv",
        "Search arXiv for papers: arxiv <query> [n]",
        papers::ArxivSearch,
    )?;
    for feed in papers::LATEST_FEEDS {
        registry.register(
            feed.command,
            &format!("Latest {} papers on arXiv: {} [n]", feed.label, feed.command),
            papers::LatestPapers(feed),
        )?;
    }

    registry.register("clear", "Clear the terminal", system::Clear)?;
    registry.register(
        "theme",
        "Change color (green/amber/blue/white)",
        system::SetTheme,
    )?;

    Ok(registry)
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::config::QtermConfig;
    use crate::error::QtermError;
    use crate::services::http::stub::StubClient;
    use crate::surface::recording::{RecordingDisplay, RecordingTheme};
    use std::rc::Rc;

    /// Handler that always answers with a fixed string.
    pub struct Reply(pub &'static str);

    #[async_trait(?Send)]
    impl CommandHandler for Reply {
        async fn execute(&self, _ctx: &mut CommandContext<'_>, _args: Vec<String>) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    /// Handler that echoes its arguments joined by `|`.
    pub struct Echo;

    #[async_trait(?Send)]
    impl CommandHandler for Echo {
        async fn execute(&self, _ctx: &mut CommandContext<'_>, args: Vec<String>) -> Result<String> {
            Ok(args.join("|"))
        }
    }

    /// Handler that always fails.
    pub struct Fail(pub &'static str);

    #[async_trait(?Send)]
    impl CommandHandler for Fail {
        async fn execute(&self, _ctx: &mut CommandContext<'_>, _args: Vec<String>) -> Result<String> {
            Err(QtermError::Config(self.0.to_string()))
        }
    }

    /// The built-in registry wired to a stub transport and recording sinks.
    pub struct Harness {
        pub stub: Rc<StubClient>,
        pub services: Services,
        pub registry: CommandRegistry,
        pub display: RecordingDisplay,
        pub theme: RecordingTheme,
    }

    impl Harness {
        pub fn new(stub: StubClient) -> Self {
            let stub = Rc::new(stub);
            let services = Services::new(stub.clone(), &QtermConfig::default());
            Self {
                stub,
                services,
                registry: build_registry().unwrap(),
                display: RecordingDisplay::default(),
                theme: RecordingTheme::default(),
            }
        }

        pub async fn run(&mut self, name: &str, args: &[&str]) -> Result<String> {
            let command = self.registry.lookup(name)?;
            let mut ctx = CommandContext {
                registry: &self.registry,
                services: &self.services,
                display: &mut self.display,
                theme: &mut self.theme,
            };
            let args = args.iter().map(|s| s.to_string()).collect();
            command.handler().execute(&mut ctx, args).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_commands_register_in_help_order() {
        let registry = build_registry().unwrap();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "help",
                "ask",
                "explain",
                "derive",
                "quiz",
                "arxiv",
                "latest_quant",
                "latest_optics",
                "latest_atom",
                "clear",
                "theme",
            ]
        );
    }
}
