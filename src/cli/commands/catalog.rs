//! Record command implementations (list, add, delete, reset).

use colored::Colorize;

use super::{connect, print_envelope, runtime};
use crate::catalog;
use crate::cli::Cli;
use crate::config::SheetConfig;
use crate::error::Result;
use crate::model::{Catalog, RowKey, CATEGORY_FIELD, KEY_FIELD};
use crate::sync::render_catalog;
use crate::validate::{build_record, validate_identity};

/// Execute `list`.
///
/// Reads the local file only; no configuration is required. Languages are
/// taken from the config when one resolves, for property order.
pub fn list(cli: &Cli, json: bool) -> Result<()> {
    let catalog = catalog::list(&cli.file)?;
    let langs = cli.load_config().map(|c| c.langs).unwrap_or_default();

    if catalog.is_empty() {
        if json {
            return print_envelope(false, "No data", serde_json::json!({ "data": [] }));
        }
        println!("No data in {}", cli.file.display());
        return Ok(());
    }

    if json {
        let data: serde_json::Value = serde_json::from_str(&render_catalog(&catalog, &langs)?)?;
        return print_envelope(
            true,
            &format!("{} records", catalog.len()),
            serde_json::json!({ "data": data }),
        );
    }

    print_table(&catalog, &langs);
    Ok(())
}

fn print_table(catalog: &Catalog, langs: &[String]) {
    println!(
        "{}",
        format!("{CATEGORY_FIELD}\t{KEY_FIELD}\t{}", langs.join("\t")).bold()
    );
    for record in catalog {
        let values = if langs.is_empty() {
            record
                .values
                .iter()
                .map(|(lang, value)| format!("{lang}={value}"))
                .collect::<Vec<_>>()
        } else {
            record.values_for(langs)
        };
        println!("{}\t{}\t{}", record.category.dimmed(), record.key, values.join("\t"));
    }
    println!();
    println!("{} records", catalog.len());
}

/// Execute `add`.
pub fn add(cli: &Cli, category: &str, key: &str, values: &[String], json: bool) -> Result<()> {
    let config = cli.load_config()?;
    let record = build_record(category, key, values, &config)?;
    let row_key = record.row_key();

    let report = runtime()?.block_on(async {
        let client = connect(&config).await?;
        catalog::add(&client, &config, &cli.file, record).await
    })?;

    let message = format!("Added {row_key}");
    if json {
        return print_envelope(true, &message, serde_json::json!({ "stats": report }));
    }
    println!("{message}");
    println!("  Local file refreshed: {} records", report.download.records);
    Ok(())
}

/// Execute `delete`.
pub fn delete(cli: &Cli, category: &str, key: &str, json: bool) -> Result<()> {
    validate_identity(category, key)?;
    let config: SheetConfig = cli.load_config()?;
    let row_key = RowKey::new(category, key);

    let stats = runtime()?.block_on(async {
        let client = connect(&config).await?;
        catalog::delete(&client, &config, &cli.file, &row_key).await
    })?;

    let message = format!("Deleted {row_key}");
    if json {
        return print_envelope(true, &message, serde_json::json!({ "stats": stats }));
    }
    println!("{message}");
    Ok(())
}

/// Execute `reset`.
pub fn reset(cli: &Cli, json: bool) -> Result<()> {
    catalog::reset(&cli.file)?;

    let message = format!("Reset {}", cli.file.display());
    if json {
        return print_envelope(true, &message, serde_json::json!({}));
    }
    println!("{message}");
    Ok(())
}
