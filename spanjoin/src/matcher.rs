use num_traits::PrimInt;

use crate::partition::SortedSide;
use crate::search::{TieBreak, insertion_point};

/// Candidate windows in one search direction: for each probe-side row, the
/// contiguous index range `[low, high)` into the other side's sorted starts
/// that can hold an overlapping counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchWindows {
    pub low: Vec<usize>,
    pub high: Vec<usize>,
    /// `high - low`, the per-row repeat count for the expansion stage.
    pub len: Vec<usize>,
    /// Non-empty window flag.
    pub mask: Vec<bool>,
}

impl MatchWindows {
    fn compute<P>(
        probe_starts: &[P],
        probe_ends: &[P],
        haystack_starts: &[P],
        low_tie: TieBreak,
        high_tie: TieBreak,
    ) -> Self
    where
        P: PrimInt + Send + Sync,
    {
        let n = probe_starts.len();
        let mut windows = MatchWindows {
            low: Vec::with_capacity(n),
            high: Vec::with_capacity(n),
            len: Vec::with_capacity(n),
            mask: Vec::with_capacity(n),
        };
        for (&start, &end) in probe_starts.iter().zip(probe_ends) {
            let low = insertion_point(haystack_starts, start, low_tie);
            let high = insertion_point(haystack_starts, end, high_tie);
            windows.low.push(low);
            windows.high.push(high);
            windows.len.push(high - low);
            windows.mask.push(high > low);
        }
        windows
    }
}

/// Both search directions for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMatches {
    /// Windows into secondary starts, one per primary row: secondary ranges
    /// whose start falls inside the primary span.
    pub in_secondary: MatchWindows,
    /// Windows into primary starts, one per secondary row: primary ranges
    /// whose start falls strictly inside the secondary span.
    pub in_primary: MatchWindows,
}

/// Compute both directions' candidate windows for one group.
///
/// Correctness hinges on the tie-break asymmetry: direction one uses a
/// leftmost lower bound (`secondary.start >= primary.start`), direction two
/// a rightmost lower bound (`primary.start > secondary.start`), so the two
/// directions partition every overlapping pair by which side starts first
/// and no pair is counted twice. The upper bound is leftmost for half-open
/// spans and rightmost for closed ones, in both directions.
pub fn match_group<P>(
    primary: &SortedSide<P>,
    secondary: &SortedSide<P>,
    closed: bool,
) -> GroupMatches
where
    P: PrimInt + Send + Sync,
{
    let high_tie = if closed {
        TieBreak::Rightmost
    } else {
        TieBreak::Leftmost
    };
    GroupMatches {
        in_secondary: MatchWindows::compute(
            &primary.starts,
            &primary.ends,
            &secondary.starts,
            TieBreak::Leftmost,
            high_tie,
        ),
        in_primary: MatchWindows::compute(
            &secondary.starts,
            &secondary.ends,
            &primary.starts,
            TieBreak::Rightmost,
            high_tie,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn side(spans: &[(i64, i64)]) -> SortedSide<i64> {
        let mut spans: Vec<(i64, i64)> = spans.to_vec();
        spans.sort_unstable();
        SortedSide {
            starts: spans.iter().map(|s| s.0).collect(),
            ends: spans.iter().map(|s| s.1).collect(),
            rows: (0..spans.len()).collect(),
            counts: vec![1; spans.len()],
            unmatchable: Vec::new(),
        }
    }

    #[test]
    fn test_windows_for_reference_scenario() {
        // primary [(0,6),(5,7),(6,10)], secondary [(1,2),(3,8),(6,7)]
        let primary = side(&[(0, 6), (5, 7), (6, 10)]);
        let secondary = side(&[(1, 2), (3, 8), (6, 7)]);
        let matches = match_group(&primary, &secondary, false);

        // secondary starts: [1, 3, 6]
        assert_eq!(matches.in_secondary.low, vec![0, 2, 2]);
        assert_eq!(matches.in_secondary.high, vec![2, 3, 3]);
        assert_eq!(matches.in_secondary.mask, vec![true, true, true]);

        // primary starts: [0, 5, 6]; (1,2) catches nothing extra,
        // (3,8) catches primary starting at 5 and 6, (6,7) nothing new
        assert_eq!(matches.in_primary.low, vec![1, 1, 3]);
        assert_eq!(matches.in_primary.high, vec![1, 3, 3]);
        assert_eq!(matches.in_primary.mask, vec![false, true, false]);
    }

    #[test]
    fn test_boundary_touch_half_open_vs_closed() {
        let primary = side(&[(0, 5)]);
        let secondary = side(&[(5, 9)]);

        let open = match_group(&primary, &secondary, false);
        assert_eq!(open.in_secondary.mask, vec![false]);
        assert_eq!(open.in_primary.mask, vec![false]);

        let closed = match_group(&primary, &secondary, true);
        assert_eq!(closed.in_secondary.mask, vec![true]);
        // caught from the primary perspective only, never both
        assert_eq!(closed.in_primary.mask, vec![false]);
    }

    #[test]
    fn test_identical_starts_counted_once() {
        let primary = side(&[(3, 6)]);
        let secondary = side(&[(3, 4)]);
        let matches = match_group(&primary, &secondary, false);
        // equal starts belong to direction one; direction two is strict
        assert_eq!(matches.in_secondary.len, vec![1]);
        assert_eq!(matches.in_primary.len, vec![0]);
    }

    #[test]
    fn test_empty_secondary_side() {
        let primary = side(&[(0, 4)]);
        let secondary = side(&[]);
        let matches = match_group(&primary, &secondary, false);
        assert_eq!(matches.in_secondary.mask, vec![false]);
        assert!(matches.in_primary.mask.is_empty());
    }
}
