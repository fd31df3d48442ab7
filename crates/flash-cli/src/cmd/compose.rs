use std::io::Write;

use anyhow::Result;

use flash_core::config::load_user_config;
use flash_core::draft::Draft;

use crate::output::{self, OutputMode};
use crate::tui;

/// Run the interactive two-step wizard and report the outcome.
///
/// Submission is a fire-and-forget handoff: the final draft is printed and
/// the persisted session state has already been cleared by the wizard.
pub fn run_compose(output: OutputMode, quiet: bool) -> Result<()> {
    let config = load_user_config()?;
    let submitted = tui::wizard::run(&config)?;

    let mut out = std::io::stdout();
    match submitted {
        Some(draft) => report_submission(&mut out, &draft, output),
        None => {
            // Quit without submitting; whatever was typed stays persisted
            // for the next session.
            if !output.is_json() && !quiet {
                writeln!(out, "Draft saved for later.")?;
            }
            Ok(())
        }
    }
}

fn report_submission(out: &mut dyn Write, draft: &Draft, output: OutputMode) -> Result<()> {
    if output.is_json() {
        writeln!(out, "{}", serde_json::to_string_pretty(draft)?)?;
        return Ok(());
    }

    writeln!(out, "Request submitted!")?;
    output::rule(out)?;
    output::kv(out, "description", &draft.description)?;
    output::kv(out, "category", draft.category.as_str())?;
    output::kv(out, "when", draft.when.as_deref().unwrap_or("-"))?;
    output::kv(out, "where", draft.where_.as_deref().unwrap_or("-"))?;
    Ok(())
}
