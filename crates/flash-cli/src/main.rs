#![forbid(unsafe_code)]

mod cmd;
mod output;
mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "flash: quick-request composer",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Compose",
        about = "Compose a request interactively",
        long_about = "Open the two-step wizard: describe the request, review the auto-filled fields, submit.",
        after_help = "EXAMPLES:\n    # Open the wizard (resumes any saved draft)\n    fl compose\n\n    # Emit the submitted request as JSON\n    fl compose --json"
    )]
    Compose,

    #[command(
        next_help_heading = "Compose",
        about = "Extract fields from request text",
        long_about = "Run field extraction and category detection over a single piece of text.",
        after_help = "EXAMPLES:\n    # See what the wizard would auto-fill\n    fl extract \"Need a phone charger at Student Center around 5pm\"\n\n    # Emit machine-readable output\n    fl extract \"lunch tomorrow 12:30\" --json"
    )]
    Extract(cmd::extract::ExtractArgs),

    #[command(
        next_help_heading = "Drafts",
        about = "Inspect or clear the saved draft",
        long_about = "Work with the session-persisted draft left behind by an unfinished compose run.",
        after_help = "EXAMPLES:\n    # Print the saved draft\n    fl draft show\n\n    # Discard it\n    fl draft clear"
    )]
    Draft(cmd::draft::DraftArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    fl completions bash\n\n    # Generate zsh completions\n    fl completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FLASH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "flash=debug,info"
        } else {
            "flash=info,warn"
        })
    });

    let format = env::var("FLASH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();

    match cli.command {
        Commands::Compose => cmd::compose::run_compose(output, cli.quiet),
        Commands::Extract(ref args) => cmd::extract::run_extract(args, output),
        Commands::Draft(ref args) => cmd::draft::run_draft(args, output, cli.quiet),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["fl", "--json", "compose"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["fl", "draft", "show", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn default_output_is_human() {
        let cli = Cli::parse_from(["fl", "compose"]);
        assert!(!cli.json);
        assert!(!cli.output_mode().is_json());
    }

    #[test]
    fn quiet_flag_parsed() {
        let cli = Cli::parse_from(["fl", "-q", "compose"]);
        assert!(cli.quiet);
    }

    #[test]
    fn extract_takes_positional_text() {
        let cli = Cli::parse_from(["fl", "extract", "charger at Clough Commons"]);
        match cli.command {
            Commands::Extract(args) => assert_eq!(args.text, "charger at Clough Commons"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn draft_show_parses() {
        let cli = Cli::parse_from(["fl", "draft", "show"]);
        assert!(matches!(
            cli.command,
            Commands::Draft(cmd::draft::DraftArgs {
                command: cmd::draft::DraftCommand::Show,
            })
        ));
    }

    #[test]
    fn draft_clear_parses() {
        let cli = Cli::parse_from(["fl", "draft", "clear"]);
        assert!(matches!(
            cli.command,
            Commands::Draft(cmd::draft::DraftArgs {
                command: cmd::draft::DraftCommand::Clear,
            })
        ));
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["fl", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Bash,
            })
        ));
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["fl", "compose"],
            vec!["fl", "extract", "x"],
            vec!["fl", "draft", "show"],
            vec!["fl", "draft", "clear"],
            vec!["fl", "completions", "bash"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?} — error: {:?}",
                args,
                result.err()
            );
        }
    }
}
