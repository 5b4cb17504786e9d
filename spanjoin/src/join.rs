use rayon::prelude::*;
use tracing::debug;

use spanjoin_core::{Column, Frame, JoinConfig, JoinError, JoinHow, ResolvedSchema, Value};

use crate::expand::{MatchedPairs, expand};
use crate::matcher::match_group;
use crate::missing::{coverage, unmatched_rows};
use crate::partition::{GroupPair, OneSided, Partitions, partition};

/// Per-group products of the matching pipeline.
struct GroupOutcome {
    pairs: MatchedPairs,
    unmatched_primary: Vec<usize>,
    unmatched_secondary: Vec<usize>,
}

/// Run matcher, expansion and missing-row computation for every paired
/// group. Groups are independent, so they fan out across the rayon pool;
/// `collect` preserves group (key) order.
fn run_pipeline(parts: &Partitions, closed: bool) -> Vec<GroupOutcome> {
    parts
        .groups
        .par_iter()
        .map(|group| {
            let matches = match_group(&group.primary, &group.secondary, closed);
            let pairs = expand(&matches);
            let unmatched_primary = unmatched_rows(
                group.primary.len(),
                &matches.in_secondary,
                &matches.in_primary,
            );
            let unmatched_secondary = unmatched_rows(
                group.secondary.len(),
                &matches.in_primary,
                &matches.in_secondary,
            );
            GroupOutcome {
                pairs,
                unmatched_primary,
                unmatched_secondary,
            }
        })
        .collect()
}

/// Join both frames on overlapping spans.
///
/// One output row per overlapping (primary, secondary) pair; for
/// `left`/`right`/`outer`, unmatched rows of the requested side(s) are
/// appended null-padded on the other side (before the matched rows unless
/// `cfg.nulls_last`). Column layout follows
/// [`ResolvedSchema`]: primary columns first, then secondary non-key
/// columns with `cfg.suffix` applied on name collision.
pub fn join(
    primary: &Frame,
    secondary: &Frame,
    cfg: &JoinConfig,
    how: JoinHow,
) -> Result<Frame, JoinError> {
    let schema = ResolvedSchema::resolve(primary, secondary, cfg)?;

    // empty-side degenerate case: for inner there is nothing to pair; the
    // other modes fall through, where partitioning yields only one-sided
    // groups and no search runs
    if (primary.is_empty() || secondary.is_empty()) && how == JoinHow::Inner {
        return Ok(Frame::empty(&schema.output.names));
    }

    let parts = partition(primary, secondary, &schema, cfg)?;
    debug!(
        groups = parts.groups.len(),
        primary_only = parts.primary_only.len(),
        secondary_only = parts.secondary_only.len(),
        "partitioned inputs"
    );
    let outcomes = run_pipeline(&parts, cfg.closed);
    let pair_total: usize = outcomes.iter().map(|o| o.pairs.len()).sum();
    debug!(pairs = pair_total, how = %how, "expanded overlap windows");

    let mut builder = ResultBuilder::new(primary, secondary, &schema);
    if cfg.nulls_last {
        emit_matched(&mut builder, &parts, &outcomes);
        emit_missing(&mut builder, &parts, &outcomes, how);
    } else {
        emit_missing(&mut builder, &parts, &outcomes, how);
        emit_matched(&mut builder, &parts, &outcomes);
    }
    let result = builder.finish()?;
    debug!(rows = result.n_rows(), "assembled join result");
    Ok(result)
}

/// Primary rows that overlap at least one secondary row, own columns only.
/// Each qualifying input row appears once (times its duplicate
/// multiplicity when `cfg.deduplicate` collapsed it).
pub fn overlaps(primary: &Frame, secondary: &Frame, cfg: &JoinConfig) -> Result<Frame, JoinError> {
    let schema = ResolvedSchema::resolve(primary, secondary, cfg)?;
    if primary.is_empty() || secondary.is_empty() {
        return Ok(primary.gather(&[]));
    }

    let parts = partition(primary, secondary, &schema, cfg)?;
    let covered: Vec<Vec<bool>> = parts
        .groups
        .par_iter()
        .map(|group| {
            let matches = match_group(&group.primary, &group.secondary, cfg.closed);
            coverage(
                group.primary.len(),
                &matches.in_secondary,
                &matches.in_primary,
            )
        })
        .collect();

    let mut row_ids = Vec::new();
    for (group, covered) in parts.groups.iter().zip(&covered) {
        for (i, &hit) in covered.iter().enumerate() {
            if hit {
                for _ in 0..group.primary.counts[i] {
                    row_ids.push(group.primary.rows[i]);
                }
            }
        }
    }
    debug!(rows = row_ids.len(), "collected overlapping rows");
    Ok(primary.gather(&row_ids))
}

/// Rows on the requested side with zero overlaps, own columns only.
/// `how` must be [`JoinHow::Left`] or [`JoinHow::Right`].
pub fn nonoverlapping(
    primary: &Frame,
    secondary: &Frame,
    cfg: &JoinConfig,
    how: JoinHow,
) -> Result<Frame, JoinError> {
    if !matches!(how, JoinHow::Left | JoinHow::Right) {
        return Err(JoinError::InvalidMode(how.to_string()));
    }
    let schema = ResolvedSchema::resolve(primary, secondary, cfg)?;
    let parts = partition(primary, secondary, &schema, cfg)?;
    let outcomes = run_pipeline(&parts, cfg.closed);

    let (entries, frame) = if how == JoinHow::Left {
        (
            collect_missing(&parts.groups, &outcomes, Side::Primary, &parts.primary_only),
            primary,
        )
    } else {
        (
            collect_missing(&parts.groups, &outcomes, Side::Secondary, &parts.secondary_only),
            secondary,
        )
    };
    let mut row_ids = Vec::new();
    for (row, count) in entries {
        for _ in 0..count {
            row_ids.push(row);
        }
    }
    debug!(rows = row_ids.len(), how = %how, "collected non-overlapping rows");
    Ok(frame.gather(&row_ids))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Primary,
    Secondary,
}

/// Missing `(input row, multiplicity)` entries for one side, merged across
/// paired and one-sided groups in ascending key order.
fn collect_missing(
    groups: &[GroupPair],
    outcomes: &[GroupOutcome],
    side: Side,
    whole: &[OneSided],
) -> Vec<(usize, u32)> {
    let mut entries: Vec<(&Vec<Value>, Vec<(usize, u32)>)> = Vec::new();
    for (group, outcome) in groups.iter().zip(outcomes) {
        let (sorted, unmatched) = match side {
            Side::Primary => (&group.primary, &outcome.unmatched_primary),
            Side::Secondary => (&group.secondary, &outcome.unmatched_secondary),
        };
        let mut rows: Vec<(usize, u32)> = unmatched
            .iter()
            .map(|&i| (sorted.rows[i], sorted.counts[i]))
            .collect();
        rows.extend(sorted.unmatchable.iter().copied());
        if !rows.is_empty() {
            entries.push((&group.key, rows));
        }
    }
    for one in whole {
        let mut rows: Vec<(usize, u32)> = one
            .side
            .rows
            .iter()
            .zip(&one.side.counts)
            .map(|(&row, &count)| (row, count))
            .collect();
        rows.extend(one.side.unmatchable.iter().copied());
        if !rows.is_empty() {
            entries.push((&one.key, rows));
        }
    }
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.into_iter().flat_map(|(_, rows)| rows).collect()
}

fn emit_matched(builder: &mut ResultBuilder<'_>, parts: &Partitions, outcomes: &[GroupOutcome]) {
    for (group, outcome) in parts.groups.iter().zip(outcomes) {
        for (i, j) in outcome.pairs.iter() {
            // Cartesian multiplicity of the two collapsed representatives
            let times = u64::from(group.primary.counts[i]) * u64::from(group.secondary.counts[j]);
            builder.push_pair(group.primary.rows[i], group.secondary.rows[j], times);
        }
    }
}

fn emit_missing(
    builder: &mut ResultBuilder<'_>,
    parts: &Partitions,
    outcomes: &[GroupOutcome],
    how: JoinHow,
) {
    if matches!(how, JoinHow::Left | JoinHow::Outer) {
        for (row, count) in collect_missing(&parts.groups, outcomes, Side::Primary, &parts.primary_only)
        {
            builder.push_primary(row, u64::from(count));
        }
    }
    if matches!(how, JoinHow::Right | JoinHow::Outer) {
        for (row, count) in
            collect_missing(&parts.groups, outcomes, Side::Secondary, &parts.secondary_only)
        {
            builder.push_secondary(row, u64::from(count));
        }
    }
}

/// Accumulates output rows against the resolved column layout.
struct ResultBuilder<'a> {
    primary: &'a Frame,
    secondary: &'a Frame,
    schema: &'a ResolvedSchema,
    /// For each output slot in the primary block: the secondary key column
    /// supplying the value when the primary side is null-padded.
    key_backfill: Vec<Option<usize>>,
    columns: Vec<Vec<Value>>,
}

impl<'a> ResultBuilder<'a> {
    fn new(primary: &'a Frame, secondary: &'a Frame, schema: &'a ResolvedSchema) -> Self {
        let key_backfill = schema
            .output
            .primary_cols
            .iter()
            .map(|col| {
                schema
                    .primary_keys
                    .iter()
                    .position(|k| k == col)
                    .map(|pos| schema.secondary_keys[pos])
            })
            .collect();
        ResultBuilder {
            primary,
            secondary,
            schema,
            key_backfill,
            columns: vec![Vec::new(); schema.output.names.len()],
        }
    }

    fn push_pair(&mut self, p_row: usize, s_row: usize, times: u64) {
        let split = self.schema.output.primary_cols.len();
        for _ in 0..times {
            for (slot, &col) in self.schema.output.primary_cols.iter().enumerate() {
                self.columns[slot].push(self.primary.value(p_row, col).clone());
            }
            for (slot, &col) in self.schema.output.secondary_cols.iter().enumerate() {
                self.columns[split + slot].push(self.secondary.value(s_row, col).clone());
            }
        }
    }

    /// Primary row with the secondary block null-padded.
    fn push_primary(&mut self, p_row: usize, times: u64) {
        let split = self.schema.output.primary_cols.len();
        for _ in 0..times {
            for (slot, &col) in self.schema.output.primary_cols.iter().enumerate() {
                self.columns[slot].push(self.primary.value(p_row, col).clone());
            }
            for slot in 0..self.schema.output.secondary_cols.len() {
                self.columns[split + slot].push(Value::Null);
            }
        }
    }

    /// Secondary row with the primary block null-padded; group-key slots
    /// are backfilled from the secondary side since the key is known.
    fn push_secondary(&mut self, s_row: usize, times: u64) {
        let split = self.schema.output.primary_cols.len();
        for _ in 0..times {
            for (slot, backfill) in self.key_backfill.iter().enumerate() {
                let value = match backfill {
                    Some(col) => self.secondary.value(s_row, *col).clone(),
                    None => Value::Null,
                };
                self.columns[slot].push(value);
            }
            for (slot, &col) in self.schema.output.secondary_cols.iter().enumerate() {
                self.columns[split + slot].push(self.secondary.value(s_row, col).clone());
            }
        }
    }

    fn finish(self) -> Result<Frame, JoinError> {
        let columns = self
            .schema
            .output
            .names
            .iter()
            .zip(self.columns)
            .map(|(name, values)| Column::new(name.clone(), values))
            .collect();
        Frame::new(columns)
    }
}
