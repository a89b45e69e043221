use std::io::Write;
use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};
use tracing::{info, warn};

use crate::db::{get_connection, require_source};
use crate::error::Result;
use crate::exporter::{fetch_transactions, total_transactions, write_csv, ExportSummary};
use crate::fmt::{amount, format_bytes};
use crate::models::TransactionRecord;

const PREVIEW_ROWS: usize = 5;
const PREVIEW_HEADER: [&str; 9] = [
    "TransactionID",
    "Date",
    "Title",
    "Amount",
    "Currency",
    "Account",
    "Category",
    "TransactionType",
    "Status",
];

/// Export every transaction, deleted ones included, to `output`.
pub fn run(database: &Path, output: &Path) -> Result<ExportSummary> {
    require_source(database)?;
    let conn = get_connection(database)?;

    let total = total_transactions(&conn)?;
    println!("Total transactions in database: {total}");

    let records = fetch_transactions(&conn)?;
    let written = write_csv(output, &records)?;
    let summary = ExportSummary::new(total, &records);
    info!(exported = summary.exported, total, "export complete");

    if summary.is_short() {
        warn!(exported = summary.exported, total, "export is missing transactions");
    }

    let stdout = std::io::stdout();
    print_summary(&mut stdout.lock(), output, written, &summary, &records)?;

    Ok(summary)
}

/// Console verification report written after the CSV is on disk.
pub fn print_summary<W: Write>(
    out: &mut W,
    output: &Path,
    written: u64,
    summary: &ExportSummary,
    records: &[TransactionRecord],
) -> Result<()> {
    writeln!(
        out,
        "Successfully exported {} transactions to {} ({})",
        summary.exported,
        output.display(),
        format_bytes(written)
    )?;
    writeln!(out, "Filtered by deleted flag: {} transactions", summary.not_sentinel_deleted)?;

    if records.is_empty() {
        writeln!(out, "\nNo transactions to preview.")?;
    } else {
        let head = &records[..records.len().min(PREVIEW_ROWS)];
        let tail = &records[records.len().saturating_sub(PREVIEW_ROWS)..];
        writeln!(out, "\nPreview of first {} transactions:\n{}", head.len(), preview_table(head))?;
        writeln!(out, "\nPreview of last {} transactions:\n{}", tail.len(), preview_table(tail))?;
    }

    if summary.is_short() {
        let msg = format!(
            "WARNING: Only extracted {} of {} transactions!",
            summary.exported, summary.total
        );
        writeln!(out, "\n{}", msg.yellow().bold())?;
        writeln!(out, "\nNull value counts in key fields:")?;
        for (column, count) in &summary.missing {
            writeln!(out, "  {column}: {count}")?;
        }
    }
    Ok(())
}

fn preview_table(records: &[TransactionRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(PREVIEW_HEADER.to_vec());
    for r in records {
        table.add_row(vec![
            Cell::new(r.id),
            Cell::new(r.date.as_deref().unwrap_or_default()),
            Cell::new(r.title.as_deref().unwrap_or_default()),
            Cell::new(r.amount.map(amount).unwrap_or_default()),
            Cell::new(r.currency.as_deref().unwrap_or_default()),
            Cell::new(r.account.as_deref().unwrap_or_default()),
            Cell::new(r.category.as_deref().unwrap_or_default()),
            Cell::new(r.transaction_type.as_deref().unwrap_or_default()),
            Cell::new(r.status.label()),
        ]);
    }
    table
}
