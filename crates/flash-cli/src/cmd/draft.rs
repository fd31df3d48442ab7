use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use flash_core::config::{load_user_config, session_dir};
use flash_core::draft::Draft;
use flash_core::store::{DraftStore, FileStore};

use crate::output::{self, OutputMode};

/// Arguments for `fl draft`.
#[derive(Args, Debug)]
pub struct DraftArgs {
    #[command(subcommand)]
    pub command: DraftCommand,
}

#[derive(Subcommand, Debug)]
pub enum DraftCommand {
    /// Print the persisted in-progress draft.
    Show,
    /// Remove the persisted draft.
    Clear,
}

/// Inspect or clear the session-persisted draft.
pub fn run_draft(args: &DraftArgs, output: OutputMode, quiet: bool) -> Result<()> {
    let config = load_user_config()?;
    let mut store = DraftStore::new(FileStore::new(session_dir(&config)));

    match args.command {
        DraftCommand::Show => show_draft(&store.load(), output),
        DraftCommand::Clear => {
            store.save(&Draft::default());
            let mut out = std::io::stdout();
            if output.is_json() {
                writeln!(out, "{}", json!({ "cleared": true }))?;
            } else if !quiet {
                writeln!(out, "Draft cleared.")?;
            }
            Ok(())
        }
    }
}

fn show_draft(draft: &Draft, output: OutputMode) -> Result<()> {
    let mut out = std::io::stdout();
    if output.is_json() {
        writeln!(out, "{}", serde_json::to_string_pretty(draft)?)?;
        return Ok(());
    }

    if draft.is_empty() {
        writeln!(out, "No draft in progress.")?;
        return Ok(());
    }

    output::kv(&mut out, "description", &draft.description)?;
    output::kv(&mut out, "category", draft.category.as_str())?;
    output::kv(&mut out, "when", draft.when.as_deref().unwrap_or("-"))?;
    output::kv(&mut out, "where", draft.where_.as_deref().unwrap_or("-"))?;
    Ok(())
}
