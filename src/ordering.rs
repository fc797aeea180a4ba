//! Ordering primitives.
//!
//! Pure functions that reorder one sequence or move an element between two.
//! Inputs are never mutated; callers validate indices before calling.

/// Remove the element at `from` and reinsert it at `to`.
///
/// Indices must be in bounds.
pub fn reorder<T: Clone>(sequence: &[T], from: usize, to: usize) -> Vec<T> {
    let mut next = sequence.to_vec();
    let item = next.remove(from);
    next.insert(to, item);
    next
}

/// Remove the element at `source_index` from `source` and insert it at
/// `dest_index` in `dest`, returning both new sequences.
///
/// `source_index` must be in bounds and `dest_index` at most `dest.len()`.
pub fn move_between<T: Clone>(
    source: &[T],
    dest: &[T],
    source_index: usize,
    dest_index: usize,
) -> (Vec<T>, Vec<T>) {
    let mut next_source = source.to_vec();
    let mut next_dest = dest.to_vec();
    let item = next_source.remove(source_index);
    next_dest.insert(dest_index, item);
    (next_source, next_dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 2, vec!['b', 'c', 'a', 'd'])]
    #[case(3, 0, vec!['d', 'a', 'b', 'c'])]
    #[case(1, 1, vec!['a', 'b', 'c', 'd'])]
    fn test_reorder(#[case] from: usize, #[case] to: usize, #[case] expected: Vec<char>) {
        let seq = vec!['a', 'b', 'c', 'd'];
        assert_eq!(reorder(&seq, from, to), expected);
        assert_eq!(seq, vec!['a', 'b', 'c', 'd']);
    }

    #[rstest]
    #[case(0, 3)]
    #[case(2, 0)]
    #[case(1, 2)]
    fn test_reorder_round_trip(#[case] i: usize, #[case] j: usize) {
        let seq = vec![10, 20, 30, 40];
        assert_eq!(reorder(&reorder(&seq, i, j), j, i), seq);
    }

    #[test]
    fn test_move_between_leaves_inputs_untouched() {
        let a = vec!["a1", "a2", "a3"];
        let b = vec!["b1"];
        let (next_a, next_b) = move_between(&a, &b, 1, 1);
        assert_eq!(next_a, vec!["a1", "a3"]);
        assert_eq!(next_b, vec!["b1", "a2"]);
        assert_eq!(a, vec!["a1", "a2", "a3"]);
        assert_eq!(b, vec!["b1"]);
    }

    #[test]
    fn test_move_between_round_trip() {
        let a = vec![1, 2, 3];
        let b = vec![7, 8];
        let (a1, b1) = move_between(&a, &b, 0, 2);
        let (b2, a2) = move_between(&b1, &a1, 2, 0);
        assert_eq!(a2, a);
        assert_eq!(b2, b);
    }

    #[test]
    fn test_move_into_empty() {
        let (src, dst) = move_between(&[1], &[], 0, 0);
        assert!(src.is_empty());
        assert_eq!(dst, vec![1]);
    }
}
