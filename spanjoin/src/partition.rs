use std::collections::BTreeMap;

use num_traits::PrimInt;
use spanjoin_core::{Frame, JoinConfig, JoinError, ResolvedSchema, Value};

/// One side of one group, sorted by `(start, end)` and optionally
/// deduplicated.
///
/// `rows` maps each representative back to its input-frame row; `counts`
/// carries how many identical input rows collapsed into it. `unmatchable`
/// holds rows that can never satisfy the overlap predicate and therefore
/// stay out of the search arrays: zero-width spans under half-open
/// semantics, and inverted (`start > end`) spans in non-strict mode. They
/// surface again on the missing path.
#[derive(Debug, Clone)]
pub struct SortedSide<P>
where
    P: PrimInt + Send + Sync,
{
    pub starts: Vec<P>,
    pub ends: Vec<P>,
    pub rows: Vec<usize>,
    pub counts: Vec<u32>,
    pub unmatchable: Vec<(usize, u32)>,
}

impl<P> SortedSide<P>
where
    P: PrimInt + Send + Sync,
{
    /// Number of searchable representative rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A group key present on both sides, with both sides materialized.
#[derive(Debug, Clone)]
pub struct GroupPair {
    pub key: Vec<Value>,
    pub primary: SortedSide<i64>,
    pub secondary: SortedSide<i64>,
}

/// A group key present on one side only; every row is trivially unmatched.
#[derive(Debug, Clone)]
pub struct OneSided {
    pub key: Vec<Value>,
    pub side: SortedSide<i64>,
}

/// Output of the partitioning stage. All three lists are in ascending key
/// order.
#[derive(Debug, Clone)]
pub struct Partitions {
    pub groups: Vec<GroupPair>,
    pub primary_only: Vec<OneSided>,
    pub secondary_only: Vec<OneSided>,
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: i64,
    end: i64,
    row: usize,
}

/// Split both frames into per-key groups, sort each group by
/// `(start, end)` and collapse duplicates when configured.
///
/// An empty `by` list yields a single implicit group spanning the whole
/// input. Rows with a null boundary are dropped. Boundary cells of any
/// other non-integer type are a schema error, as is `start > end` in
/// strict mode; both are raised before any search work.
pub fn partition(
    primary: &Frame,
    secondary: &Frame,
    schema: &ResolvedSchema,
    cfg: &JoinConfig,
) -> Result<Partitions, JoinError> {
    let primary_spans = extract_spans(primary, schema.primary_start, schema.primary_end, cfg)?;
    let secondary_spans =
        extract_spans(secondary, schema.secondary_start, schema.secondary_end, cfg)?;

    let primary_map = group_rows(primary, &schema.primary_keys, primary_spans);
    let mut secondary_map = group_rows(secondary, &schema.secondary_keys, secondary_spans);

    let mut groups = Vec::new();
    let mut primary_only = Vec::new();
    for (key, spans) in primary_map {
        match secondary_map.remove(&key) {
            Some(other) => groups.push(GroupPair {
                key,
                primary: build_side(primary, spans, cfg),
                secondary: build_side(secondary, other, cfg),
            }),
            None => primary_only.push(OneSided {
                side: build_side(primary, spans, cfg),
                key,
            }),
        }
    }
    let secondary_only = secondary_map
        .into_iter()
        .map(|(key, spans)| OneSided {
            side: build_side(secondary, spans, cfg),
            key,
        })
        .collect();

    Ok(Partitions {
        groups,
        primary_only,
        secondary_only,
    })
}

/// Read and validate the boundary columns. Rows with a null boundary are
/// dropped here; they never reach the search or missing paths.
fn extract_spans(
    frame: &Frame,
    start_col: usize,
    end_col: usize,
    cfg: &JoinConfig,
) -> Result<Vec<Span>, JoinError> {
    let mut spans = Vec::with_capacity(frame.n_rows());
    for row in 0..frame.n_rows() {
        let start = read_boundary(frame, row, start_col)?;
        let end = read_boundary(frame, row, end_col)?;
        let (Some(start), Some(end)) = (start, end) else {
            continue;
        };
        if cfg.strict && start > end {
            return Err(JoinError::InvertedRange { row, start, end });
        }
        spans.push(Span { start, end, row });
    }
    Ok(spans)
}

fn read_boundary(frame: &Frame, row: usize, col: usize) -> Result<Option<i64>, JoinError> {
    match frame.value(row, col) {
        Value::Int(v) => Ok(Some(*v)),
        Value::Null => Ok(None),
        other => Err(JoinError::BoundaryType {
            column: frame.columns()[col].name().to_string(),
            found: other.clone(),
            row,
        }),
    }
}

/// BTreeMap so downstream stages see groups in ascending key order.
fn group_rows(
    frame: &Frame,
    key_cols: &[usize],
    spans: Vec<Span>,
) -> BTreeMap<Vec<Value>, Vec<Span>> {
    let mut map: BTreeMap<Vec<Value>, Vec<Span>> = BTreeMap::new();
    for span in spans {
        let key: Vec<Value> = key_cols
            .iter()
            .map(|&col| frame.value(span.row, col).clone())
            .collect();
        map.entry(key).or_default().push(span);
    }
    map
}

fn build_side(frame: &Frame, spans: Vec<Span>, cfg: &JoinConfig) -> SortedSide<i64> {
    let (mut matchable, mut excluded): (Vec<Span>, Vec<Span>) = spans
        .into_iter()
        .partition(|s| s.start < s.end || (cfg.closed && s.start == s.end));

    matchable.sort_unstable_by_key(|s| (s.start, s.end, s.row));
    excluded.sort_unstable_by_key(|s| (s.start, s.end, s.row));

    let mut side = SortedSide {
        starts: Vec::with_capacity(matchable.len()),
        ends: Vec::with_capacity(matchable.len()),
        rows: Vec::with_capacity(matchable.len()),
        counts: Vec::with_capacity(matchable.len()),
        unmatchable: excluded.iter().map(|s| (s.row, 1)).collect(),
    };

    // walk runs of equal (start, end); duplicates can only hide in a run
    let mut i = 0;
    while i < matchable.len() {
        let mut j = i + 1;
        while j < matchable.len()
            && matchable[j].start == matchable[i].start
            && matchable[j].end == matchable[i].end
        {
            j += 1;
        }
        if cfg.deduplicate {
            let mut reps: Vec<(usize, u32)> = Vec::new();
            for span in &matchable[i..j] {
                match reps
                    .iter_mut()
                    .find(|(rep, _)| rows_equal(frame, *rep, span.row))
                {
                    Some((_, count)) => *count += 1,
                    None => reps.push((span.row, 1)),
                }
            }
            for (row, count) in reps {
                side.starts.push(matchable[i].start);
                side.ends.push(matchable[i].end);
                side.rows.push(row);
                side.counts.push(count);
            }
        } else {
            for span in &matchable[i..j] {
                side.starts.push(span.start);
                side.ends.push(span.end);
                side.rows.push(span.row);
                side.counts.push(1);
            }
        }
        i = j;
    }
    side
}

fn rows_equal(frame: &Frame, a: usize, b: usize) -> bool {
    frame.row(a).eq(frame.row(b))
}
