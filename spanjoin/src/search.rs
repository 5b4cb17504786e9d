use num_traits::PrimInt;

/// Tie-break rule for binary-search insertion points.
///
/// `Leftmost` returns the first index whose element is `>= key`;
/// `Rightmost` the first index whose element is `> key`. The choice encodes
/// interval closedness when searching an end boundary: `Rightmost`
/// implements closed (`<=`) matching, `Leftmost` open (`<`) matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    Leftmost,
    Rightmost,
}

/// Binary search for the insertion position of `key` in a sorted slice.
///
/// Returns the index where `key` would be inserted to keep `haystack`
/// sorted, resolving ties per `tie`. Branch-light cursor walk, O(log n).
#[inline]
pub fn insertion_point<P>(haystack: &[P], key: P, tie: TieBreak) -> usize
where
    P: PrimInt,
{
    let stays_left = |v: P| match tie {
        TieBreak::Leftmost => v < key,
        TieBreak::Rightmost => v <= key,
    };

    if haystack.is_empty() || !stays_left(haystack[0]) {
        return 0;
    } else if stays_left(haystack[haystack.len() - 1]) {
        return haystack.len();
    }

    let mut cursor = 0;
    let mut length = haystack.len();
    while length > 1 {
        let half = length >> 1;
        length -= half;
        cursor += usize::from(stays_left(haystack[cursor + half - 1])) * half;
    }
    cursor
}

/// Insertion points for every needle, one probe per needle over the full
/// haystack.
pub fn search_sorted<P>(haystack: &[P], needles: &[P], tie: TieBreak) -> Vec<usize>
where
    P: PrimInt,
{
    needles
        .iter()
        .map(|&needle| insertion_point(haystack, needle, tie))
        .collect()
}
