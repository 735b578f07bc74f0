//! Actions and request parameters
//!
//! An [`Action`] is one of the eight operations the facade supports. A
//! [`Request`] carries the action together with its parameters, collected
//! once from external input and validated before any engine work happens.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default number of rows returned by `sample` when no limit is given.
pub const DEFAULT_SAMPLE_LIMIT: usize = 5;

/// The closed set of operations the facade supports.
///
/// Unknown action names are rejected at the [`FromStr`] boundary, so every
/// downstream `match` on `Action` is exhaustive and adding a variant is a
/// compile-time checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Count rows in a CSV file without importing it.
    Count,
    /// Return a limited row subset of a CSV file.
    Sample,
    /// Create (or replace) a table from a CSV file.
    Import,
    /// Summary statistics for one column of a CSV file.
    Stats,
    /// Column names and inferred types of an existing table.
    Schema,
    /// Per-column storage and compression metadata of an existing table.
    Compression,
    /// Row counts grouped by distinct values of one column.
    Group,
    /// Arbitrary user-supplied SQL, passed through verbatim.
    Query,
}

impl Action {
    /// All actions, in CLI help order.
    pub const ALL: [Action; 8] = [
        Action::Count,
        Action::Sample,
        Action::Import,
        Action::Stats,
        Action::Schema,
        Action::Compression,
        Action::Group,
        Action::Query,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::Count => "count",
            Action::Sample => "sample",
            Action::Import => "import",
            Action::Stats => "stats",
            Action::Schema => "schema",
            Action::Compression => "compression",
            Action::Group => "group",
            Action::Query => "query",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Action> {
        match s {
            "count" => Ok(Action::Count),
            "sample" => Ok(Action::Sample),
            "import" => Ok(Action::Import),
            "stats" => Ok(Action::Stats),
            "schema" => Ok(Action::Schema),
            "compression" => Ok(Action::Compression),
            "group" => Ok(Action::Group),
            "query" => Ok(Action::Query),
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }
}

/// One invocation's worth of parameters.
///
/// Built fresh from CLI flags or API arguments, checked with
/// [`Request::validate`], and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Request {
    pub action: Action,
    pub file: Option<PathBuf>,
    pub table: Option<String>,
    pub column: Option<String>,
    pub limit: usize,
    pub random: bool,
    pub overwrite: bool,
    pub sql: Option<String>,
}

impl Request {
    pub fn new(action: Action) -> Request {
        Request {
            action,
            file: None,
            table: None,
            column: None,
            limit: DEFAULT_SAMPLE_LIMIT,
            random: false,
            overwrite: false,
            sql: None,
        }
    }

    /// Check that every parameter the selected action requires is present.
    ///
    /// Runs before any engine call; a failure here means the engine was
    /// never touched.
    pub fn validate(&self) -> Result<()> {
        match self.action {
            Action::Count => {
                self.required_file()?;
            }
            Action::Sample => {
                self.required_file()?;
                if self.limit == 0 {
                    return Err(Error::InvalidParameter(
                        "--limit must be at least 1".to_string(),
                    ));
                }
            }
            Action::Import => {
                self.required_file()?;
                self.required_table()?;
            }
            Action::Stats => {
                self.required_file()?;
                self.required_column()?;
            }
            Action::Schema => {
                self.required_table()?;
            }
            Action::Compression => {
                self.required_table()?;
            }
            Action::Group => {
                self.required_file()?;
                self.required_column()?;
            }
            Action::Query => {
                self.required_sql()?;
            }
        }
        Ok(())
    }

    pub(crate) fn required_file(&self) -> Result<&Path> {
        self.file.as_deref().ok_or(Error::MissingParameter {
            action: self.action,
            param: "file",
        })
    }

    pub(crate) fn required_table(&self) -> Result<&str> {
        self.table.as_deref().ok_or(Error::MissingParameter {
            action: self.action,
            param: "table",
        })
    }

    pub(crate) fn required_column(&self) -> Result<&str> {
        self.column.as_deref().ok_or(Error::MissingParameter {
            action: self.action,
            param: "column",
        })
    }

    pub(crate) fn required_sql(&self) -> Result<&str> {
        self.sql.as_deref().ok_or(Error::MissingParameter {
            action: self.action,
            param: "sql",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_action_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn test_unknown_action() {
        let err = "shred".parse::<Action>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "Configuration error: unknown action 'shred'");
    }

    #[test]
    fn test_validate_missing_required() {
        let err = Request::new(Action::Count).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("--file"));

        let mut req = Request::new(Action::Import);
        req.file = Some(PathBuf::from("people.csv"));
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("--table"));

        let mut req = Request::new(Action::Stats);
        req.file = Some(PathBuf::from("people.csv"));
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("--column"));

        let err = Request::new(Action::Query).validate().unwrap_err();
        assert!(err.to_string().contains("--sql"));
    }

    #[test]
    fn test_validate_zero_limit() {
        let mut req = Request::new(Action::Sample);
        req.file = Some(PathBuf::from("people.csv"));
        req.limit = 0;
        let err = req.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_validate_complete_request() {
        let mut req = Request::new(Action::Group);
        req.file = Some(PathBuf::from("people.csv"));
        req.column = Some("Job Title".to_string());
        assert!(req.validate().is_ok());
    }
}
