use crate::matcher::MatchWindows;

/// Which representative rows of a side have at least one overlap.
///
/// This is the index-subtraction formulation: a row is covered when its own
/// window in the opposite side is non-empty, or when any opposite-direction
/// window spans its index. Everything else matched nothing.
pub fn coverage(n: usize, own: &MatchWindows, opposite: &MatchWindows) -> Vec<bool> {
    debug_assert_eq!(own.mask.len(), n);
    let mut covered = vec![false; n];
    for (i, &masked) in own.mask.iter().enumerate() {
        if masked {
            covered[i] = true;
        }
    }
    for (j, &masked) in opposite.mask.iter().enumerate() {
        if masked {
            for slot in &mut covered[opposite.low[j]..opposite.high[j]] {
                *slot = true;
            }
        }
    }
    covered
}

/// Representative rows with zero overlaps, in sorted-span order.
pub fn unmatched_rows(n: usize, own: &MatchWindows, opposite: &MatchWindows) -> Vec<usize> {
    coverage(n, own, opposite)
        .into_iter()
        .enumerate()
        .filter_map(|(i, covered)| (!covered).then_some(i))
        .collect()
}
