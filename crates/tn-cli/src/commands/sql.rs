//! Sql command implementation - renders a diff document to SQL

use anyhow::{Context, Result};
use std::io::Read;
use tn_core::SchemaDiff;

use crate::cli::SqlArgs;

/// Execute the sql command
pub(crate) async fn execute(args: &SqlArgs) -> Result<()> {
    let text = read_input(&args.input)?;
    let sql = render(&text)?;
    if !sql.is_empty() {
        println!("{}", sql);
    }
    Ok(())
}

/// Parse a diff document and render it.
fn render(text: &str) -> Result<String> {
    let diff = SchemaDiff::from_json(text)?;
    log::debug!("Rendering {} diff entries", diff.len());
    Ok(tn_core::generate(&diff))
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read diff from stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(input).with_context(|| format!("Failed to read diff file: {}", input))
}

#[cfg(test)]
#[path = "sql_test.rs"]
mod tests;
