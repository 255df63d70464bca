mod args;
mod complete;
mod logging;
mod print;
mod repl;
mod styles;

use args::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use print::TerminalDisplay;
use qterm::commands::build_registry;
use qterm::config::QtermConfig;
use qterm::dispatch::{Dispatcher, Outcome};
use qterm::error::Result;
use qterm::render::{HtmlMarkup, Markup, TerminalMarkup};
use qterm::services::Services;
use std::path::PathBuf;
use styles::Palette;

struct AppPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppPaths {
    fn resolve(cli: &Cli) -> Self {
        if let Some(dir) = &cli.config_dir {
            return Self {
                config_dir: dir.clone(),
                data_dir: dir.clone(),
            };
        }
        match ProjectDirs::from("org", "qterm", "qterm") {
            Some(dirs) => Self {
                config_dir: dirs.config_dir().to_path_buf(),
                data_dir: dirs.data_dir().to_path_buf(),
            },
            None => {
                let fallback = PathBuf::from(".qterm");
                Self {
                    config_dir: fallback.clone(),
                    data_dir: fallback,
                }
            }
        }
    }
}

/// Parses arguments and runs the chosen mode. Returns the process exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    let paths = AppPaths::resolve(&cli);
    logging::init(&paths.data_dir, cli.verbose);

    let color = !cli.no_color && console::colors_enabled();
    colored::control::set_override(color);

    let stored = QtermConfig::load(&paths.config_dir)?;
    let config = stored.clone().with_env_overrides();
    let theme = cli.theme.unwrap_or(config.theme);
    let palette = Palette::new(theme, color);
    tracing::debug!(config_dir = %paths.config_dir.display(), %theme, "starting");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Some(Commands::Run { html, line }) => {
            runtime.block_on(run_once(&config, palette, color, html, &line.join(" ")))
        }
        Some(Commands::Config { init }) => handle_config(&stored, &config, &paths, init),
        Some(Commands::Shell) | None => {
            let services = Services::connect(&config)?;
            runtime.block_on(repl::run_shell(&services, palette, color, &paths.data_dir))?;
            Ok(0)
        }
    }
}

async fn run_once(
    config: &QtermConfig,
    mut palette: Palette,
    color: bool,
    html: bool,
    line: &str,
) -> Result<i32> {
    let registry = build_registry()?;
    let services = Services::connect(config)?;
    let mut dispatcher = Dispatcher::new(&registry, &services);
    let mut display = TerminalDisplay::stdout();

    let markup: Box<dyn Markup> = if html {
        Box::new(HtmlMarkup)
    } else {
        Box::new(TerminalMarkup::new(color).with_plain_style(palette.primary()))
    };

    let outcome = dispatcher
        .submit(line, markup.as_ref(), &mut display, &mut palette)
        .await;
    Ok(match outcome {
        Outcome::NotFound(_) | Outcome::Failed(_) => 1,
        _ => 0,
    })
}

/// Prints the effective configuration. `--init` writes the stored one (never
/// the environment credential) back to disk.
fn handle_config(
    stored: &QtermConfig,
    config: &QtermConfig,
    paths: &AppPaths,
    init: bool,
) -> Result<i32> {
    if init {
        stored.save(&paths.config_dir)?;
        println!("Wrote {}", paths.config_dir.join("config.json").display());
    }

    let mut shown = config.clone();
    if shown.api_key.is_some() {
        shown.api_key = Some("********".to_string());
    }
    println!("# {}", paths.config_dir.display());
    println!("{}", serde_json::to_string_pretty(&shown)?);
    Ok(0)
}
