use crate::matcher::GroupMatches;

/// Flat list of matched representative pairs for one group. `primary[k]`
/// and `secondary[k]` index into the group's two [`SortedSide`]s.
///
/// [`SortedSide`]: crate::partition::SortedSide
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedPairs {
    pub primary: Vec<usize>,
    pub secondary: Vec<usize>,
}

impl MatchedPairs {
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.primary
            .iter()
            .copied()
            .zip(self.secondary.iter().copied())
    }
}

/// Turn the compact windows into the flat pair list.
///
/// Direction-one pairs come first, in primary-row order with each window
/// walked left to right; then direction-two pairs in secondary-row order.
/// The two directions are disjoint by the matcher's tie-break asymmetry, so
/// no pair is emitted twice. Multiplicity counts are applied later, when
/// result rows are materialized.
pub fn expand(matches: &GroupMatches) -> MatchedPairs {
    let mut pairs = MatchedPairs::default();

    let dir1 = &matches.in_secondary;
    for (i, &masked) in dir1.mask.iter().enumerate() {
        if masked {
            for j in dir1.low[i]..dir1.high[i] {
                pairs.primary.push(i);
                pairs.secondary.push(j);
            }
        }
    }

    let dir2 = &matches.in_primary;
    for (j, &masked) in dir2.mask.iter().enumerate() {
        if masked {
            for i in dir2.low[j]..dir2.high[j] {
                pairs.primary.push(i);
                pairs.secondary.push(j);
            }
        }
    }

    pairs
}
