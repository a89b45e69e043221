use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use tracing::{debug, warn};

use crate::db::{count_rows, TRANSACTIONS_TABLE};
use crate::error::Result;
use crate::models::{scale_amount, Status, TransactionRecord, CSV_COLUMNS, DELETED_SENTINEL};

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

// Every join is LEFT so a transaction survives a missing or deleted reference.
// Pass-through text columns are cast so a value stored under another storage
// class (e.g. an all-digit date in the NUMERIC-affinity date column) still reads.
const EXPORT_QUERY: &str = "
SELECT
    T.transactionsTableID,
    CAST(T.date AS TEXT),
    CAST(I.itemName AS TEXT),
    CAST(T.amount AS REAL),
    CAST(T.transactionCurrency AS TEXT),
    CAST(T.conversionRateNew AS REAL),
    CAST(A.accountName AS TEXT),
    CAST(AT.accountTypeName AS TEXT),
    CAST(C.childCategoryName AS TEXT),
    CAST(P.parentCategoryName AS TEXT),
    CAST(CG.categoryGroupName AS TEXT),
    CAST(TT.transactionTypeName AS TEXT),
    CAST(T.notes AS TEXT),
    T.status,
    T.accountReference,
    CAST(A2.accountName AS TEXT),
    T.deletedTransaction,
    T.uidPairID,
    T.reminderTransaction,
    T.creditCardInstallment
FROM TRANSACTIONSTABLE AS T
LEFT JOIN ITEMTABLE AS I ON T.itemID = I.itemTableID
LEFT JOIN ACCOUNTSTABLE AS A ON T.accountID = A.accountsTableID
LEFT JOIN ACCOUNTTYPETABLE AS AT ON A.accountTypeID = AT.accountTypeTableID
LEFT JOIN CHILDCATEGORYTABLE AS C ON T.categoryID = C.categoryTableID
LEFT JOIN PARENTCATEGORYTABLE AS P ON C.parentCategoryID = P.parentCategoryTableID
LEFT JOIN CATEGORYGROUPTABLE AS CG ON P.categoryGroupID = CG.categoryGroupTableID
LEFT JOIN TRANSACTIONTYPETABLE AS TT ON T.transactionTypeID = TT.transactionTypeTableID
LEFT JOIN ACCOUNTSTABLE AS A2 ON T.accountReference = A2.accountsTableID
ORDER BY T.date DESC, T.transactionsTableID DESC
";

pub fn total_transactions(conn: &Connection) -> Result<i64> {
    count_rows(conn, TRANSACTIONS_TABLE)
}

pub fn fetch_transactions(conn: &Connection) -> Result<Vec<TransactionRecord>> {
    let mut stmt = conn.prepare(EXPORT_QUERY)?;
    let records = stmt
        .query_map([], |row| {
            let status_code = int_column(row, 13)?;
            Ok(TransactionRecord {
                id: row.get(0)?,
                date: row.get(1)?,
                title: row.get(2)?,
                amount: row.get::<_, Option<f64>>(3)?.map(scale_amount),
                currency: row.get(4)?,
                conversion_rate: row.get(5)?,
                account: row.get(6)?,
                account_type: row.get(7)?,
                category: row.get(8)?,
                parent_category: row.get(9)?,
                category_group: row.get(10)?,
                transaction_type: row.get(11)?,
                notes: row.get(12)?,
                status_code,
                to_account_id: int_column(row, 14)?,
                to_account: row.get(15)?,
                deleted_flag: int_column(row, 16)?,
                transfer_pair_id: int_column(row, 17)?,
                recurring_flag: int_column(row, 18)?,
                installment_flag: int_column(row, 19)?,
                status: Status::from_code(status_code),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    debug!(rows = records.len(), "fetched joined transactions");
    Ok(records)
}

/// Integer code/flag columns. A value that is not a whole number reads as
/// absent instead of failing the row.
fn int_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get::<_, Value>(idx)? {
        Value::Integer(i) => Some(i),
        Value::Real(r) if r.fract() == 0.0 => Some(r as i64),
        Value::Text(t) => t.trim().parse().ok(),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// CSV output
// ---------------------------------------------------------------------------

pub fn render_csv(records: &[TransactionRecord]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    if records.is_empty() {
        wtr.write_record(CSV_COLUMNS)?;
    }
    for record in records {
        wtr.serialize(record)?;
    }
    Ok(wtr.into_inner()?)
}

/// Render the whole file in memory, then replace `path` in a single write.
/// Nothing is left on disk if rendering fails. Returns the byte count.
pub fn write_csv(path: &Path, records: &[TransactionRecord]) -> Result<u64> {
    let bytes = render_csv(records)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote csv");
    Ok(bytes.len() as u64)
}

// ---------------------------------------------------------------------------
// Verification summary
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ExportSummary {
    pub total: i64,
    pub exported: usize,
    pub not_sentinel_deleted: usize,
    /// Absent values per reference-derived column, in report order.
    pub missing: Vec<(&'static str, usize)>,
}

impl ExportSummary {
    pub fn new(total: i64, records: &[TransactionRecord]) -> Self {
        let exported = records.len();
        let not_sentinel_deleted = records
            .iter()
            .filter(|r| r.deleted_flag != Some(DELETED_SENTINEL))
            .count();
        let count_missing = |f: fn(&TransactionRecord) -> bool| records.iter().filter(|r| f(r)).count();
        let missing = vec![
            ("Title", count_missing(|r| r.title.is_none())),
            ("Account", count_missing(|r| r.account.is_none())),
            ("Category", count_missing(|r| r.category.is_none())),
            ("TransactionType", count_missing(|r| r.transaction_type.is_none())),
        ];

        if exported as i64 > total {
            warn!(exported, total, "join produced more rows than the transaction table holds");
        }

        Self {
            total,
            exported,
            not_sentinel_deleted,
            missing,
        }
    }

    pub fn is_short(&self) -> bool {
        (self.exported as i64) < self.total
    }
}
