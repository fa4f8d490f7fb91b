//! Sync command implementations (upload, download, status).
//!
//! Each command loads the configuration, authenticates once, and runs one
//! pipeline on a runtime created for the command.

use std::path::Path;

use colored::Colorize;

use super::{connect, print_envelope, runtime};
use crate::cli::Cli;
use crate::error::Result;
use crate::sync::{sheet_row_number, DownloadStats, Downloader, MutationOp, UploadReport, Uploader};

/// Execute `upload`.
pub fn upload(cli: &Cli, dry_run: bool, json: bool) -> Result<()> {
    let config = cli.load_config()?;
    let report = runtime()?.block_on(async {
        let client = connect(&config).await?;
        Uploader::new(&client, &config)
            .upload(&cli.file, dry_run)
            .await
            .map_err(crate::Error::from)
    })?;

    print_upload(&report, json)
}

/// Execute `status`: the upload plan, never applied.
pub fn status(cli: &Cli, json: bool) -> Result<()> {
    upload(cli, true, json)
}

/// Execute `download`.
pub fn download(cli: &Cli, json: bool) -> Result<()> {
    let config = cli.load_config()?;
    let stats = runtime()?.block_on(async {
        let client = connect(&config).await?;
        Downloader::new(&client, &config)
            .download(&cli.file)
            .await
            .map_err(crate::Error::from)
    })?;

    print_download(&stats, &cli.file, json)
}

fn upload_message(report: &UploadReport) -> String {
    let stats = &report.stats;
    if stats.is_empty() {
        return "Already synchronized".to_string();
    }
    let summary = format!(
        "{} to append, {} to update, {} to delete",
        stats.appended, stats.updated, stats.deleted
    );
    if stats.dry_run {
        format!("Plan: {summary}")
    } else {
        format!(
            "Uploaded: {} appended, {} updated, {} deleted",
            stats.appended, stats.updated, stats.deleted
        )
    }
}

fn print_upload(report: &UploadReport, json: bool) -> Result<()> {
    let message = upload_message(report);
    if json {
        return print_envelope(
            true,
            &message,
            serde_json::json!({ "stats": report.stats, "ops": report.ops }),
        );
    }

    println!("{message}");
    if report.stats.dry_run {
        for op in &report.ops {
            print_op(op);
        }
        if report.stats.header_written {
            println!("  {} header row", "~".yellow());
        }
    }
    Ok(())
}

fn print_op(op: &MutationOp) {
    match op {
        MutationOp::Append(values) => {
            println!("  {} {}", "+".green(), values.row_key().to_string().bold());
        }
        MutationOp::Update { row, values } => {
            println!(
                "  {} {} {}",
                "~".yellow(),
                values.row_key().to_string().bold(),
                format!("(row {})", sheet_row_number(*row)).dimmed()
            );
        }
        MutationOp::Delete { row, key } => {
            println!(
                "  {} {} {}",
                "-".red(),
                key.to_string().bold(),
                format!("(row {})", sheet_row_number(*row)).dimmed()
            );
        }
    }
}

fn print_download(stats: &DownloadStats, path: &Path, json: bool) -> Result<()> {
    let message = if stats.is_empty() {
        "Sheet has no data rows; nothing written".to_string()
    } else {
        format!("Downloaded {} records to {}", stats.records, path.display())
    };

    if json {
        return print_envelope(true, &message, serde_json::json!({ "stats": stats }));
    }

    println!("{message}");
    if stats.skipped > 0 {
        println!("  Skipped {} rows with an empty key", stats.skipped);
    }
    for file in &stats.locale_files {
        let marker = if file.changed { "updated".green() } else { "unchanged".dimmed() };
        println!("  {} ({} entries, {marker})", file.path, file.entries);
    }
    Ok(())
}
