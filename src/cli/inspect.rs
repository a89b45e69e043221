use std::io::Write;
use std::path::Path;

use rusqlite::types::Value;

use crate::db::{count_rows, get_connection, list_tables, sample_transactions};
use crate::error::Result;

const SAMPLE_ROWS: usize = 3;

/// Print table row counts and a raw transaction sample. Errors are printed
/// and swallowed; unlike export, a failed inspection never fails the process.
pub fn run(database: &Path) {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = report(&mut out, database) {
        let _ = writeln!(out, "Debug error: {e}");
    }
}

pub fn report<W: Write>(out: &mut W, database: &Path) -> Result<()> {
    let conn = get_connection(database)?;

    writeln!(out, "\n==== DATABASE STRUCTURE DEBUG INFO ====")?;
    for table in list_tables(&conn)? {
        let count = count_rows(&conn, &table)?;
        writeln!(out, "{table}: {count} rows")?;
    }

    writeln!(out, "\nDirect TRANSACTIONSTABLE query (first {SAMPLE_ROWS} rows):")?;
    for row in sample_transactions(&conn, SAMPLE_ROWS)? {
        writeln!(out, "{}", format_row(&row))?;
    }
    Ok(())
}

fn format_row(values: &[Value]) -> String {
    let fields: Vec<String> = values.iter().map(format_value).collect();
    format!("({})", fields.join(", "))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => format!("{r:?}"),
        Value::Text(s) => format!("'{s}'"),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}
