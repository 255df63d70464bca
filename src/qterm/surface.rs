//! Capabilities handed to command handlers for their side effects.
//!
//! Handlers never touch the terminal directly: clearing the screen goes
//! through a [`DisplaySink`], palette changes through a [`ThemeSink`].
//! The CLI supplies terminal-backed implementations; tests supply recorders.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a displayed block represents, so the sink can style it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Output,
    Error,
}

pub trait DisplaySink {
    /// Appends an already-rendered block.
    fn show(&mut self, markup: &str, kind: OutputKind);

    /// Removes every block shown so far.
    fn clear(&mut self);
}

pub trait ThemeSink {
    fn set_theme(&mut self, theme: Theme);

    fn theme(&self) -> Theme;
}

/// The primary-colour palettes the terminal supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Green,
    Amber,
    Blue,
    White,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[Theme::Green, Theme::Amber, Theme::Blue, Theme::White]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Green => "green",
            Theme::Amber => "amber",
            Theme::Blue => "blue",
            Theme::White => "white",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Theme::Green => (0x00, 0xFF, 0x00),
            Theme::Amber => (0xFF, 0xBF, 0x00),
            Theme::Blue => (0x00, 0xBF, 0xFF),
            Theme::White => (0xFF, 0xFF, 0xFF),
        }
    }

    /// Resolves a user-supplied name, falling back to the default palette.
    pub fn from_name_or_default(name: Option<&str>) -> Theme {
        name.and_then(|n| n.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::all()
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown theme: {}", s))
    }
}

/// In-memory sinks for exercising handlers without a terminal.
#[cfg(test)]
pub mod recording {
    use super::*;

    #[derive(Debug, Default)]
    pub struct RecordingDisplay {
        pub blocks: Vec<(String, OutputKind)>,
        pub clears: usize,
    }

    impl DisplaySink for RecordingDisplay {
        fn show(&mut self, markup: &str, kind: OutputKind) {
            self.blocks.push((markup.to_string(), kind));
        }

        fn clear(&mut self) {
            self.blocks.clear();
            self.clears += 1;
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingTheme {
        pub current: Theme,
        pub changes: Vec<Theme>,
    }

    impl ThemeSink for RecordingTheme {
        fn set_theme(&mut self, theme: Theme) {
            self.current = theme;
            self.changes.push(theme);
        }

        fn theme(&self) -> Theme {
            self.current
        }
    }
}
