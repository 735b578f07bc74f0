//! Result normalization and rendering
//!
//! Engine results are normalized into [`Outcome`] values: a scalar row
//! count, an import summary, or a [`Table`]. Tables render as ASCII grids
//! for the terminal and serialize to JSON for programmatic use.

use std::fmt;

use duckdb::types::ValueRef;
use serde::Serialize;

/// One typed cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Narrow an engine value to the facade's scalar set. Exotic engine
    /// types fall back to their textual form.
    pub(crate) fn from_engine(value: ValueRef<'_>) -> Scalar {
        match value {
            ValueRef::Null => Scalar::Null,
            ValueRef::Boolean(b) => Scalar::Bool(b),
            ValueRef::TinyInt(v) => Scalar::Int(v as i64),
            ValueRef::SmallInt(v) => Scalar::Int(v as i64),
            ValueRef::Int(v) => Scalar::Int(v as i64),
            ValueRef::BigInt(v) => Scalar::Int(v),
            ValueRef::UTinyInt(v) => Scalar::Int(v as i64),
            ValueRef::USmallInt(v) => Scalar::Int(v as i64),
            ValueRef::UInt(v) => Scalar::Int(v as i64),
            ValueRef::HugeInt(v) => Scalar::Text(v.to_string()),
            ValueRef::Float(v) => Scalar::Float(v as f64),
            ValueRef::Double(v) => Scalar::Float(v),
            ValueRef::Text(bytes) => Scalar::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Scalar::Text(format!("<blob {} bytes>", bytes.len())),
            other => Scalar::Text(format!("{:?}", other)),
        }
    }

    /// Cell value as an integer, when it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Cell value as text, when it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("NULL"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// An ordered tabular result: column names plus rows of scalars.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Scalar>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Render at most `max_rows` rows, reporting how many were held back.
    pub fn render_limited(&self, max_rows: usize) -> String {
        let shown = self.rows.len().min(max_rows);
        let truncated = Table {
            columns: self.columns.clone(),
            rows: self.rows[..shown].to_vec(),
        };
        let mut out = truncated.to_string();
        if shown < self.rows.len() {
            out.push_str(&format!("(showing {} of {} rows)\n", shown, self.rows.len()));
        }
        out
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() && self.rows.is_empty() {
            return Ok(());
        }

        // Calculate column widths
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        for row in &self.rows {
            for (i, value) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(value.to_string().len());
                }
            }
        }

        let separator: String = widths
            .iter()
            .map(|w| "-".repeat(*w + 2))
            .collect::<Vec<_>>()
            .join("+");
        let separator = format!("+{}+\n", separator);

        // Header
        f.write_str(&separator)?;
        let header: String = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!(" {:^width$} ", c, width = *w))
            .collect::<Vec<_>>()
            .join("|");
        writeln!(f, "|{}|", header)?;
        f.write_str(&separator)?;

        // Rows
        for row in &self.rows {
            let row_str: String = row
                .iter()
                .zip(&widths)
                .map(|(v, w)| format!(" {:>width$} ", v.to_string(), width = *w))
                .collect::<Vec<_>>()
                .join("|");
            writeln!(f, "|{}|", row_str)?;
        }

        if !self.rows.is_empty() {
            f.write_str(&separator)?;
        }

        writeln!(f, "{} row(s) returned", self.rows.len())
    }
}

/// Normalized outcome of one action.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Scalar row count (`count`).
    Count { rows: i64 },
    /// Import summary (`import`).
    Imported { table: String, rows: i64 },
    /// Tabular result (everything else).
    Table(Table),
}
