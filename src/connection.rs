//! DuckDB connection wrapper with CSV ingestion and query execution.
//!
//! The input CSV is loaded once into an in-memory table with an explicit
//! column schema; every aggregation afterwards is plain SQL over that table.

use crate::config;
use crate::error::{Result, SummaryError};
use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Wraps a DuckDB connection and tracks which tables have been loaded.
pub struct Connection {
    conn: DuckDbConnection,
    loaded_tables: RefCell<HashSet<String>>,
}

impl Connection {
    /// Open an in-memory DuckDB database with no tables loaded.
    pub fn new() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn,
            loaded_tables: RefCell::new(HashSet::new()),
        })
    }

    /// Load a sales CSV into the `transactions` table.
    ///
    /// The header must name every column in [`config::transaction_columns`];
    /// extra columns are ignored and the delimiter must be a comma. Values
    /// are cast to their declared types while reading, dates through
    /// [`config::DATE_FORMATS`] (slash dates month-first), so an unparseable
    /// date or a non-numeric `units` / `price` aborts the load. Empty cells
    /// become `NULL`.
    ///
    /// The derived `revenue` column (`units * price`) is computed here, once
    /// per row.
    pub fn load_transactions_csv(&self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(SummaryError::InputNotFound(path.to_path_buf()));
        }

        // Use forward slashes for DuckDB compatibility
        let path_str = quote_literal(&path.to_string_lossy().replace('\\', "/"));
        let columns = config::transaction_columns();

        let header = self.csv_header(&path_str)?;
        if let Some((missing, _)) = columns.iter().find(|(name, _)| !header.contains(*name)) {
            return Err(SummaryError::MissingColumn(missing.to_string()));
        }

        // Dates are read as text and parsed in the SELECT, so the sniffer
        // never picks a day-first reading of values like 01/02/2024.
        let types_sql = columns
            .iter()
            .map(|(name, ty)| {
                let read_ty = if *ty == "DATE" { "VARCHAR" } else { *ty };
                format!("'{}': '{}'", name, read_ty)
            })
            .collect::<Vec<_>>()
            .join(", ");
        let select_sql = columns
            .iter()
            .map(|(name, ty)| {
                if *ty == "DATE" {
                    format!("{} AS \"{}\"", date_sql(name), name)
                } else {
                    format!("\"{}\"", name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let table = config::TRANSACTIONS_TABLE;
        self.conn.execute_batch(&format!(
            "CREATE OR REPLACE TABLE {} AS \
             SELECT {}, \"units\" * \"price\" AS revenue \
             FROM read_csv({}, header = true, delim = ',', types = {{{}}})",
            table, select_sql, path_str, types_sql
        ))?;
        self.loaded_tables.borrow_mut().insert(table.to_string());

        log::info!("Loaded {} -> {}", path.display(), table);
        Ok(())
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Automatically converts DuckDB types to `serde_json::Value`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        log::debug!("execute: {}", sql);
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available after the query has run
        let (column_names, column_count): (Vec<String>, usize) = match rows_result.as_ref() {
            Some(executed) => (
                executed
                    .column_names()
                    .into_iter()
                    .map(|s| s.to_string())
                    .collect(),
                executed.column_count(),
            ),
            None => return Ok(Vec::new()),
        };

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_count);
            for (i, col_name) in column_names.iter().enumerate() {
                let value = convert_value_ref(row.get_ref(i)?);
                map.insert(col_name.clone(), value);
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(
                row.into_iter().collect::<serde_json::Map<String, serde_json::Value>>(),
            );
            let item: T = serde_json::from_value(value)?;
            results.push(item);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        log::debug!("execute_scalar: {}", sql);
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            let value = convert_value_ref(row.get_ref(0)?);
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Check whether a table has been loaded.
    pub fn has_table(&self, name: &str) -> bool {
        self.loaded_tables.borrow().contains(name)
    }

    /// Fail with `InvalidArgument` unless the table has been loaded.
    pub fn require_table(&self, name: &str) -> Result<()> {
        if self.has_table(name) {
            Ok(())
        } else {
            Err(SummaryError::InvalidArgument(format!(
                "table '{}' has not been loaded",
                name
            )))
        }
    }

    /// Return the names of all loaded tables, sorted.
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loaded_tables.borrow().iter().cloned().collect();
        names.sort();
        names
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }

    /// Column names of the CSV header, read as untyped text.
    ///
    /// Only sniffs the file; no values are cast, so a bad cell cannot mask
    /// a missing column.
    fn csv_header(&self, path_sql: &str) -> Result<HashSet<String>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT column_name FROM \
             (DESCRIBE SELECT * FROM read_csv({}, header = true, delim = ',', all_varchar = true))",
            path_sql
        ))?;

        let mut rows = stmt.query([])?;
        let mut names = HashSet::new();
        while let Some(row) = rows.next()? {
            let col_name: String = row.get(0)?;
            names.insert(col_name);
        }
        Ok(names)
    }
}

/// Render a string as a single-quoted SQL literal.
fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Parse a text column into a `DATE`.
///
/// ISO dates go through a plain cast; the remaining layouts are tried in
/// [`config::DATE_FORMATS`] order. Text that no layout accepts raises a
/// conversion error. Empty cells stay `NULL`.
fn date_sql(column: &str) -> String {
    let col = format!("\"{}\"", column);
    let mut attempts = vec![format!("TRY_CAST({} AS DATE)", col)];
    attempts.extend(config::DATE_FORMATS.iter().map(|fmt| {
        format!("CAST(TRY_STRPTIME({}, {}) AS DATE)", col, quote_literal(fmt))
    }));
    let parsed = format!("COALESCE({})", attempts.join(", "));

    format!(
        "CASE WHEN {col} IS NOT NULL AND {parsed} IS NULL \
         THEN CAST(error('Could not convert string ''' || {col} || ''' to DATE') AS DATE) \
         ELSE {parsed} END",
        col = col,
        parsed = parsed
    )
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
///
/// Non-finite floats become `null`. Dates are not converted here; queries
/// cast them to `VARCHAR` so they arrive as ISO `YYYY-MM-DD` text.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UTinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::USmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HugeInt may not fit in i64; try i64, fallback to string
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        _ => serde_json::Value::Null,
    }
}
