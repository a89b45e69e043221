use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::{ExportError, Result};

pub const TRANSACTIONS_TABLE: &str = "TRANSACTIONSTABLE";

/// Open the Bluecoins database without write access. The file must already
/// exist; SQLite is never allowed to create it.
pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    debug!(path = %db_path.display(), "opened database read-only");
    Ok(conn)
}

pub fn require_source(db_path: &Path) -> Result<()> {
    if db_path.is_file() {
        Ok(())
    } else {
        Err(ExportError::MissingSource(db_path.to_path_buf()))
    }
}

pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(names)
}

pub fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    let sql = format!("SELECT count(*) FROM {}", quote_ident(table));
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

/// Raw key columns of the first `limit` transactions, no joins.
pub fn sample_transactions(conn: &Connection, limit: usize) -> Result<Vec<Vec<Value>>> {
    let mut stmt = conn.prepare(
        "SELECT transactionsTableID, date, amount, transactionTypeID, deletedTransaction \
         FROM TRANSACTIONSTABLE LIMIT ?1",
    )?;
    let width = stmt.column_count();
    let rows = stmt
        .query_map([limit as i64], |row| {
            (0..width).map(|i| row.get::<_, Value>(i)).collect::<rusqlite::Result<Vec<_>>>()
        })?
        .collect::<std::result::Result<Vec<Vec<Value>>, _>>()?;
    Ok(rows)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_require_source_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = require_source(&dir.path().join("missing.fydb")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingSource);
    }

    #[test]
    fn test_require_source_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(require_source(dir.path()).is_err());
    }

    #[test]
    fn test_get_connection_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.fydb");
        assert!(get_connection(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_connection_is_read_only() {
        let (_dir, path) = seeded_db();
        let conn = get_connection(&path).unwrap();
        let res = conn.execute("DELETE FROM TRANSACTIONSTABLE", []);
        assert!(res.is_err());
        assert_eq!(count_rows(&conn, TRANSACTIONS_TABLE).unwrap(), 5);
    }

    #[test]
    fn test_list_tables_in_catalog_order() {
        let (_dir, path) = seeded_db();
        let conn = get_connection(&path).unwrap();
        let tables = list_tables(&conn).unwrap();
        assert_eq!(tables.len(), 8);
        assert_eq!(tables.first().map(String::as_str), Some("ITEMTABLE"));
        assert_eq!(tables.last().map(String::as_str), Some(TRANSACTIONS_TABLE));
    }

    #[test]
    fn test_count_rows() {
        let (_dir, path) = seeded_db();
        let conn = get_connection(&path).unwrap();
        assert_eq!(count_rows(&conn, "ACCOUNTSTABLE").unwrap(), 2);
        assert_eq!(count_rows(&conn, "CHILDCATEGORYTABLE").unwrap(), 3);
    }

    #[test]
    fn test_count_rows_quotes_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.fydb");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch("CREATE TABLE \"odd name\" (x INTEGER); INSERT INTO \"odd name\" VALUES (1);")
                .unwrap();
        }
        let conn = get_connection(&path).unwrap();
        assert_eq!(count_rows(&conn, "odd name").unwrap(), 1);
    }

    #[test]
    fn test_sample_transactions_raw_values() {
        let (_dir, path) = seeded_db();
        let conn = get_connection(&path).unwrap();
        let rows = sample_transactions(&conn, 3).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            vec![
                Value::Integer(1),
                Value::Text("2024-03-05 10:00:00".to_string()),
                Value::Integer(1_234_560),
                Value::Integer(2),
                Value::Integer(5),
            ]
        );
    }

    #[test]
    fn test_count_rows_unknown_table_is_operational() {
        let (_dir, path) = seeded_db();
        let conn = get_connection(&path).unwrap();
        let err = count_rows(&conn, "NOPE").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Operational);
    }
}
