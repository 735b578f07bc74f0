//! Engine sessions
//!
//! A [`Session`] owns one connection to the embedded DuckDB engine for its
//! whole lifetime. The connection is released when the session is dropped,
//! on every exit path; [`Session::close`] is available when the caller
//! wants close failures surfaced instead.
//!
//! The session is the facade boundary: it builds one SQL statement per
//! action from quoted, untrusted parameters, runs it, and wraps any engine
//! failure with the action and target it was executing.

use std::path::Path;

use duckdb::Connection;
use tracing::{debug, info};

use crate::action::{Action, Request};
use crate::error::{Error, Result};
use crate::output::{Outcome, Scalar, Table};

/// Quote an untrusted identifier (table or column name) for interpolation
/// into a statement. The engine has no parameter binding for identifiers,
/// so quoting is the only defense.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote an untrusted string literal (file path, pragma argument).
fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// A path as an engine string literal, lossy for non-UTF-8 paths.
fn path_literal(path: &Path) -> String {
    quote_literal(&path.to_string_lossy())
}

/// One open connection to the embedded engine.
pub struct Session {
    conn: Connection,
}

impl Session {
    /// Open a session against a database file, or in-memory when `db` is
    /// absent.
    pub fn open(db: Option<&Path>) -> Result<Session> {
        let conn = match db {
            Some(path) => Connection::open(path),
            None => Connection::open_in_memory(),
        }
        .map_err(Error::OpenFailed)?;
        debug!(db = ?db, "session opened");
        Ok(Session { conn })
    }

    /// Validate a request and dispatch it to the matching action method.
    pub fn run(&self, request: &Request) -> Result<Outcome> {
        request.validate()?;
        match request.action {
            Action::Count => {
                let rows = self.count(request.required_file()?)?;
                Ok(Outcome::Count { rows })
            }
            Action::Sample => self
                .sample(request.required_file()?, request.limit, request.random)
                .map(Outcome::Table),
            Action::Import => {
                let table = request.required_table()?;
                let rows =
                    self.import(request.required_file()?, table, request.overwrite)?;
                Ok(Outcome::Imported {
                    table: table.to_string(),
                    rows,
                })
            }
            Action::Stats => self
                .stats(request.required_file()?, request.required_column()?)
                .map(Outcome::Table),
            Action::Schema => self.schema(request.required_table()?).map(Outcome::Table),
            Action::Compression => self
                .compression(request.required_table()?)
                .map(Outcome::Table),
            Action::Group => self
                .group(request.required_file()?, request.required_column()?)
                .map(Outcome::Table),
            Action::Query => self.query(request.required_sql()?).map(Outcome::Table),
        }
    }

    /// Count rows in a CSV file without materializing its contents.
    pub fn count(&self, file: &Path) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM read_csv_auto({})", path_literal(file));
        self.fetch_scalar_i64(Action::Count, &file.to_string_lossy(), &sql)
    }

    /// First `limit` rows of a CSV file in file order, or exactly `limit`
    /// distinct rows chosen by reservoir sampling when `random` is set.
    pub fn sample(&self, file: &Path, limit: usize, random: bool) -> Result<Table> {
        let source = format!("read_csv_auto({})", path_literal(file));
        let sql = if random {
            format!("SELECT * FROM {} USING SAMPLE {} ROWS", source, limit)
        } else {
            format!("SELECT * FROM {} LIMIT {}", source, limit)
        };
        self.fetch_table(Action::Sample, &file.to_string_lossy(), &sql)
    }

    /// Create a table from a CSV file, replacing any existing table when
    /// `overwrite` is set. Returns the resulting row count.
    pub fn import(&self, file: &Path, table: &str, overwrite: bool) -> Result<i64> {
        let create = if overwrite {
            "CREATE OR REPLACE TABLE"
        } else {
            "CREATE TABLE"
        };
        let sql = format!(
            "{} {} AS SELECT * FROM read_csv_auto({})",
            create,
            quote_ident(table),
            path_literal(file)
        );
        self.execute(Action::Import, table, &sql)?;

        let count_sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let rows = self.fetch_scalar_i64(Action::Import, table, &count_sql)?;
        info!(table, rows, "import complete");
        Ok(rows)
    }

    /// Count, distinct count, minimum and maximum for one column of a CSV
    /// file, as a one-row table.
    pub fn stats(&self, file: &Path, column: &str) -> Result<Table> {
        let col = quote_ident(column);
        let sql = format!(
            "SELECT COUNT({col}) AS count, \
             COUNT(DISTINCT {col}) AS distinct_count, \
             MIN({col}) AS min_value, \
             MAX({col}) AS max_value \
             FROM read_csv_auto({})",
            path_literal(file),
            col = col,
        );
        self.fetch_table(Action::Stats, column, &sql)
    }

    /// Column names and inferred types of an existing table.
    pub fn schema(&self, table: &str) -> Result<Table> {
        let sql = format!("DESCRIBE {}", quote_ident(table));
        self.fetch_table(Action::Schema, table, &sql)
    }

    /// Per-column storage and compression metadata of an existing table,
    /// with block bookkeeping columns stripped.
    pub fn compression(&self, table: &str) -> Result<Table> {
        let sql = format!(
            "SELECT * EXCLUDE (column_path, segment_id, start, persistent, \
             block_id, stats, block_offset, has_updates) \
             FROM pragma_storage_info({}) \
             ORDER BY row_group_id",
            quote_literal(table)
        );
        self.fetch_table(Action::Compression, table, &sql)
    }

    /// Row counts per distinct value of `column`, largest group first.
    /// NULL keys form their own group, so the counts always sum to the
    /// file's row count.
    pub fn group(&self, file: &Path, column: &str) -> Result<Table> {
        let col = quote_ident(column);
        let sql = format!(
            "SELECT {col}, COUNT(*) AS count \
             FROM read_csv_auto({}) \
             GROUP BY {col} \
             ORDER BY count DESC",
            path_literal(file),
            col = col,
        );
        self.fetch_table(Action::Group, column, &sql)
    }

    /// Run caller-supplied SQL verbatim. The caller owns the statement's
    /// safety; nothing is quoted or rewritten here.
    pub fn query(&self, sql: &str) -> Result<Table> {
        self.fetch_table(Action::Query, sql, sql)
    }

    /// Close the session, surfacing close failures as resource errors.
    /// Dropping the session releases the connection too; this variant is
    /// for callers who want to observe the failure.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_conn, e)| Error::CloseFailed(e))
    }

    fn execute(&self, action: Action, target: &str, sql: &str) -> Result<()> {
        debug!(%action, sql, "executing statement");
        self.conn
            .execute_batch(sql)
            .map_err(|e| Error::from_engine(action, target, e))
    }

    fn fetch_scalar_i64(&self, action: Action, target: &str, sql: &str) -> Result<i64> {
        debug!(%action, sql, "executing statement");
        self.conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(|e| Error::from_engine(action, target, e))
    }

    fn fetch_table(&self, action: Action, target: &str, sql: &str) -> Result<Table> {
        debug!(%action, sql, "executing statement");
        let wrap = |e: duckdb::Error| Error::from_engine(action, target, e);

        let mut stmt = self.conn.prepare(sql).map_err(wrap)?;
        let mut rows = stmt.query([]).map_err(wrap)?;

        let columns: Vec<String> = rows
            .as_ref()
            .map(|s| s.column_names().iter().map(|c| c.to_string()).collect())
            .unwrap_or_default();

        let mut table = Table {
            columns,
            rows: Vec::new(),
        };
        while let Some(row) = rows.next().map_err(wrap)? {
            let mut values = Vec::with_capacity(table.columns.len());
            for i in 0..table.columns.len() {
                let value = row.get_ref(i).map_err(wrap)?;
                values.push(Scalar::from_engine(value));
            }
            table.rows.push(values);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("job"), "\"job\"");
        assert_eq!(quote_ident("Job Title"), "\"Job Title\"");
        assert_eq!(quote_ident("evil\"name"), "\"evil\"\"name\"");
    }

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("people.csv"), "'people.csv'");
        assert_eq!(quote_literal("it's.csv"), "'it''s.csv'");
    }
}
