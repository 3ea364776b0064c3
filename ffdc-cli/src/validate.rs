use anyhow::{Context, Result, bail};
use std::path::Path;
use target_tree::yaml_model::TreeDocument;

pub fn run_validate(input: &Path, quiet: bool, summary: bool) -> Result<()> {
    let text =
        std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let mut all_errors: Vec<String> = Vec::new();

    if let Err(schema_errors) = target_tree::validate_tree_schema(&text) {
        for e in &schema_errors {
            all_errors.push(e.to_string());
        }
    }

    // Semantic checks only run on documents that deserialize
    if let Ok(doc) = serde_yaml::from_str::<TreeDocument>(&text) {
        for issue in target_tree::validate_semantics(&doc) {
            all_errors.push(issue.to_string());
        }
    }

    if all_errors.is_empty() {
        if !quiet {
            println!("{}: valid", input.display());
        }
        return Ok(());
    }

    let plural = if all_errors.len() == 1 { "" } else { "s" };

    if !quiet && !summary {
        for e in &all_errors {
            eprintln!("{}: {e}", input.display());
        }
    }

    if summary || !quiet {
        println!(
            "{}: {} validation error{plural}",
            input.display(),
            all_errors.len()
        );
    }

    bail!(
        "{} validation error{plural} in {}",
        all_errors.len(),
        input.display()
    );
}
