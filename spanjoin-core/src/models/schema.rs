use std::fmt::{self, Display};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::JoinError;
use crate::models::frame::Frame;

/// Join mode: which side's unmatched ranges are kept (null-padded) in the
/// result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JoinHow {
    Inner,
    Left,
    Right,
    Outer,
}

impl FromStr for JoinHow {
    type Err = JoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inner" => Ok(JoinHow::Inner),
            "left" => Ok(JoinHow::Left),
            "right" => Ok(JoinHow::Right),
            "outer" => Ok(JoinHow::Outer),
            other => Err(JoinError::InvalidMode(other.to_string())),
        }
    }
}

impl Display for JoinHow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JoinHow::Inner => "inner",
            JoinHow::Left => "left",
            JoinHow::Right => "right",
            JoinHow::Outer => "outer",
        };
        write!(f, "{}", s)
    }
}

/// Configuration for an interval join.
///
/// `start`/`end` name the boundary columns on both sides. `by` names the
/// group-key columns; when empty the whole input is one implicit group.
/// Secondary columns colliding with a primary column name are renamed by
/// appending `suffix`; `by` columns are never renamed or duplicated.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JoinConfig {
    pub start: String,
    pub end: String,
    pub by: Vec<String>,
    pub suffix: String,
    /// Closed-interval (`[start, end]`, overlap via `<=`) rather than the
    /// default half-open (`[start, end)`, overlap via `<`) semantics.
    pub closed: bool,
    /// Collapse identical rows pre-join into one representative carrying a
    /// multiplicity count, re-expanded only in the final result.
    pub deduplicate: bool,
    /// Place null-padded missing rows after matched rows instead of before.
    pub nulls_last: bool,
    /// Reject rows with `start > end` instead of treating them as
    /// unmatchable.
    pub strict: bool,
}

impl Default for JoinConfig {
    fn default() -> Self {
        JoinConfig {
            start: "start".to_string(),
            end: "end".to_string(),
            by: Vec::new(),
            suffix: "_right".to_string(),
            closed: false,
            deduplicate: false,
            nulls_last: false,
            strict: false,
        }
    }
}

impl JoinConfig {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        JoinConfig {
            start: start.into(),
            end: end.into(),
            ..JoinConfig::default()
        }
    }

    pub fn by(mut self, keys: &[&str]) -> Self {
        self.by = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    pub fn deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }
}

/// The output column layout: all primary columns in input order, then
/// secondary non-key columns, suffix-renamed on collision. Computed once at
/// resolution time and reused by every downstream stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Output column names.
    pub names: Vec<String>,
    /// Source column indices into the primary frame, aligned with the head
    /// of `names`.
    pub primary_cols: Vec<usize>,
    /// Source column indices into the secondary frame, aligned with the
    /// tail of `names`.
    pub secondary_cols: Vec<usize>,
}

/// Column references resolved from a [`JoinConfig`] against two concrete
/// frames. Replaces stringly-typed column lookups downstream: every stage
/// after resolution works with positional indices only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    pub primary_start: usize,
    pub primary_end: usize,
    pub secondary_start: usize,
    pub secondary_end: usize,
    pub primary_keys: Vec<usize>,
    pub secondary_keys: Vec<usize>,
    pub output: OutputLayout,
}

impl ResolvedSchema {
    /// Resolve all referenced columns, failing fast before any search work.
    pub fn resolve(
        primary: &Frame,
        secondary: &Frame,
        cfg: &JoinConfig,
    ) -> Result<Self, JoinError> {
        let require = |frame: &Frame, name: &str| {
            frame
                .column_index(name)
                .ok_or_else(|| JoinError::MissingColumn(name.to_string()))
        };

        let primary_start = require(primary, &cfg.start)?;
        let primary_end = require(primary, &cfg.end)?;
        let secondary_start = require(secondary, &cfg.start)?;
        let secondary_end = require(secondary, &cfg.end)?;

        let mut primary_keys = Vec::with_capacity(cfg.by.len());
        let mut secondary_keys = Vec::with_capacity(cfg.by.len());
        for key in &cfg.by {
            primary_keys.push(require(primary, key)?);
            secondary_keys.push(require(secondary, key)?);
        }

        let primary_names: Vec<&str> = primary.names().collect();
        let mut names: Vec<String> = primary_names.iter().map(|n| n.to_string()).collect();
        let primary_cols: Vec<usize> = (0..primary.n_cols()).collect();

        let mut secondary_cols = Vec::new();
        for (idx, col) in secondary.columns().iter().enumerate() {
            if secondary_keys.contains(&idx) {
                continue;
            }
            let name = if primary_names.contains(&col.name()) {
                format!("{}{}", col.name(), cfg.suffix)
            } else {
                col.name().to_string()
            };
            names.push(name);
            secondary_cols.push(idx);
        }

        Ok(ResolvedSchema {
            primary_start,
            primary_end,
            secondary_start,
            secondary_end,
            primary_keys,
            secondary_keys,
            output: OutputLayout {
                names,
                primary_cols,
                secondary_cols,
            },
        })
    }
}
