//! # Qterm Architecture
//!
//! Qterm is a command terminal for studying quantum optics: an AI tutor and an
//! arXiv paper search behind a small set of typed commands, with answers
//! rendered so that `$$...$$` math and DOI references read well on screen.
//!
//! As with any library-first tool, the terminal is just one client. Everything
//! below the CLI works on Rust values and two capability traits, so the same
//! core can drive an HTML surface or a test harness.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Line editor, prompt, completion, colours, exit codes     │
//! │  - The ONLY place that touches stdout or the terminal       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Dispatch (dispatch.rs) + Rendering (render/)               │
//! │  - One line in, one rendered block out                      │
//! │  - Math and DOI substitution behind the `Markup` trait      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs) + Registry (registry.rs)          │
//! │  - Name → handler table, built once at startup              │
//! │  - Handlers return the raw text to render                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Services (services/)                                       │
//! │  - AI completion and arXiv clients over `HttpClient`        │
//! │  - Failures come back as displayable text, never panics     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Capabilities, Not Globals
//!
//! Handlers never reach for a terminal. They get a
//! [`commands::CommandContext`] holding the registry, the services, and two
//! narrow traits from [`surface`]: a [`surface::DisplaySink`] (for `clear`)
//! and a [`surface::ThemeSink`] (for `theme`). Tests pass recording sinks and
//! a stub transport; the CLI passes the real terminal.
//!
//! ## Testing Strategy
//!
//! 1. **Services and rendering**: unit tests against canned HTTP replies and
//!    literal strings. Most of the behaviour lives here.
//! 2. **Commands**: a harness runs each handler over a stub transport and
//!    inspects the request it sent.
//! 3. **CLI**: `tests/` drives the binary in one-shot mode.
//!
//! ## Module Overview
//!
//! - [`commands`]: Built-in command handlers and the registry they form
//! - [`registry`]: Command table, help text, and prefix completion
//! - [`dispatch`]: Line parsing and the single-flight dispatcher
//! - [`render`]: Math and DOI substitution over pluggable markup
//! - [`services`]: HTTP transport, AI completion, arXiv search
//! - [`surface`]: Output kinds, themes, display and theme capabilities
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Line editing, colours, logging, and one-shot mode for the binary (not part of the lib API)

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod render;
pub mod services;
pub mod surface;
