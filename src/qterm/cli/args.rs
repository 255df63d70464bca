use clap::{Parser, Subcommand};
use qterm::surface::Theme;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "qterm", bin_name = "qterm", version)]
#[command(about = "Quantum optics terminal: AI tutor and arXiv search", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding config.json, history and the log file
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub config_dir: Option<PathBuf>,

    /// Starting palette: green, amber, blue or white
    #[arg(long, global = true, help_heading = "Options")]
    pub theme: Option<Theme>,

    /// Disable colours and hyperlinks
    #[arg(long, global = true, help_heading = "Options")]
    pub no_color: bool,

    /// Verbose logging to the log file
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive terminal (default)
    Shell,

    /// Run one terminal command and print its rendered output
    Run {
        /// Emit HTML markup instead of terminal styling
        #[arg(long)]
        html: bool,

        /// The command line, e.g. `arxiv squeezed light 3`
        #[arg(
            required = true,
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "COMMAND"
        )]
        line: Vec<String>,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to config.json
        #[arg(long)]
        init: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_shell() {
        let cli = Cli::try_parse_from(["qterm"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.no_color);
    }

    #[test]
    fn run_collects_the_whole_line() {
        let cli = Cli::try_parse_from(["qterm", "run", "arxiv", "cavity", "qed", "-3"]).unwrap();
        match cli.command {
            Some(Commands::Run { html, line }) => {
                assert!(!html);
                assert_eq!(line, vec!["arxiv", "cavity", "qed", "-3"]);
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn run_requires_a_command() {
        assert!(Cli::try_parse_from(["qterm", "run"]).is_err());
    }

    #[test]
    fn global_options_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["qterm", "run", "--html", "help"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Run { html: true, .. })));

        let cli = Cli::try_parse_from(["qterm", "--theme", "amber", "--no-color"]).unwrap();
        assert_eq!(cli.theme, Some(Theme::Amber));
        assert!(cli.no_color);
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(Cli::try_parse_from(["qterm", "--theme", "magenta"]).is_err());
    }
}
