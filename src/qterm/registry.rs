//! # Command Registry
//!
//! A fixed table from command name to description and handler. It is built
//! once at startup (see [`crate::commands::build_registry`]) and only read
//! afterwards; the dispatcher and the help command borrow it.

use crate::commands::CommandHandler;
use crate::error::{QtermError, Result};
use std::collections::HashMap;
use unicode_width::UnicodeWidthStr;

pub struct Command {
    name: String,
    description: String,
    handler: Box<dyn CommandHandler>,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Result of prefix-completing a partial command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    NoMatch,
    Unique(String),
    Ambiguous(Vec<String>),
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    by_name: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: &str,
        description: &str,
        handler: impl CommandHandler + 'static,
    ) -> Result<()> {
        if self.by_name.contains_key(name) {
            return Err(QtermError::DuplicateCommand(name.to_string()));
        }
        self.by_name.insert(name.to_string(), self.commands.len());
        self.commands.push(Command {
            name: name.to_string(),
            description: description.to_string(),
            handler: Box::new(handler),
        });
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&Command> {
        self.by_name
            .get(name)
            .map(|&i| &self.commands[i])
            .ok_or_else(|| QtermError::CommandNotFound(name.to_string()))
    }

    /// `(name, description)` pairs in registration order.
    pub fn list(&self) -> impl Iterator<Item = (&str, &str)> {
        self.commands
            .iter()
            .map(|c| (c.name.as_str(), c.description.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Width of the name column in help output: longest name plus two.
    pub fn column_width(&self) -> usize {
        self.names().map(|n| n.width()).max().unwrap_or(0) + 2
    }

    pub fn help_text(&self) -> String {
        let width = self.column_width();
        let mut out = String::from("COMMANDS:");
        for (name, description) in self.list() {
            let description = if description.is_empty() {
                "No description available"
            } else {
                description
            };
            let pad = width.saturating_sub(name.width());
            out.push_str(&format!("\n  {}{}{}", name, " ".repeat(pad), description));
        }
        out
    }

    /// Registered names starting with `prefix`, in registration order.
    pub fn complete(&self, prefix: &str) -> Completion {
        complete_name(self.names(), prefix)
    }
}

/// Prefix-matches `prefix` against `names`, keeping their order.
pub fn complete_name<'a>(names: impl IntoIterator<Item = &'a str>, prefix: &str) -> Completion {
    let mut matches: Vec<String> = names
        .into_iter()
        .filter(|n| n.starts_with(prefix))
        .map(str::to_string)
        .collect();

    match matches.len() {
        0 => Completion::NoMatch,
        1 => Completion::Unique(matches.remove(0)),
        _ => Completion::Ambiguous(matches),
    }
}
