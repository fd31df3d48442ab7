use std::io::Write;

use anyhow::Result;
use clap::Args;
use serde_json::json;

use flash_core::classify::{Category, Classify, KeywordClassifier};
use flash_core::extract::extract;

use crate::output::{self, OutputMode};

/// Arguments for `fl extract`.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Request text to extract fields from.
    pub text: String,
}

/// One-shot extraction: print the category/when/where a wizard pass would
/// auto-fill from this text. Non-matches are empty, never errors.
pub fn run_extract(args: &ExtractArgs, output: OutputMode) -> Result<()> {
    let extracted = extract(&args.text);
    let category = if args.text.trim().is_empty() {
        Category::default()
    } else {
        KeywordClassifier.classify(&args.text)
    };

    let mut out = std::io::stdout();
    if output.is_json() {
        let value = json!({
            "category": category.to_string(),
            "when": extracted.when,
            "where": extracted.where_,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    output::kv(&mut out, "category", category.as_str())?;
    output::kv(&mut out, "when", display_or_dash(&extracted.when))?;
    output::kv(&mut out, "where", display_or_dash(&extracted.where_))?;
    Ok(())
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
