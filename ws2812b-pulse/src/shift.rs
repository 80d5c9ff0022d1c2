//! Cyclic shift offsets for running lights.
//!
//! The current offset is owned by the caller. Advance it with [`shift`] and
//! encode again to get the next frame of the animation.

/// Returns `(current + delta) mod sequence_len`, always in `0..sequence_len`.
///
/// An empty sequence has no positions, the result is then `0`.
pub fn shift(current: isize, delta: isize, sequence_len: usize) -> usize {
    if sequence_len == 0 {
        return 0;
    }
    // Widened so that extreme offsets neither overflow nor lose their residue.
    let sum = current as i128 + delta as i128;
    sum.rem_euclid(sequence_len as i128) as usize
}

/// Normalize an arbitrary offset into `0..sequence_len`.
pub fn normalize(offset: isize, sequence_len: usize) -> usize {
    shift(offset, 0, sequence_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_forward() {
        assert_eq!(shift(2, 1, 3), 0);
        assert_eq!(shift(0, 7, 3), 1);
    }

    #[test]
    fn wraps_backward_to_non_negative() {
        assert_eq!(shift(0, -1, 3), 2);
        assert_eq!(shift(1, -10, 4), 3);
    }

    #[test]
    fn composes() {
        for n in 1..6usize {
            for x in -7..7isize {
                for d1 in -9..9isize {
                    for d2 in -9..9isize {
                        let stepwise = shift(shift(x, d1, n) as isize, d2, n);
                        assert_eq!(stepwise, shift(x, d1 + d2, n), "x={x} d1={d1} d2={d2} n={n}");
                    }
                }
            }
        }
    }

    #[test]
    fn extreme_offsets() {
        assert_eq!(shift(isize::MAX, isize::MAX, 7), ((isize::MAX as i128 * 2) % 7) as usize);
        assert_eq!(shift(isize::MIN, -1, 2), 1);
    }

    #[test]
    fn empty_sequence() {
        assert_eq!(shift(5, 3, 0), 0);
        assert_eq!(normalize(-4, 0), 0);
    }
}
