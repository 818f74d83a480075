//! Index and sub-range resolution shared by every container.
//!
//! Negative indices count from the tail: `-1` is the last element and
//! `-len` the first. Sub-range upper bounds use a shifted rule where a
//! negative end is inclusive of the element it addresses, so `0..-1`
//! covers the whole container.

use crate::error::SliceError;

/// Resolve a possibly negative index against `len`.
///
/// Returns the physical slot, or `None` when the index addresses no live
/// element.
pub fn resolve_index(len: usize, index: isize) -> Option<usize> {
    if index >= 0 {
        let slot = index as usize;
        (slot < len).then_some(slot)
    } else {
        len.checked_sub(index.unsigned_abs())
    }
}

/// Resolve an exclusive upper bound. Accepts `[-len, len]`.
fn resolve_end(len: usize, end: isize) -> Option<usize> {
    if end >= 0 {
        let slot = end as usize;
        (slot <= len).then_some(slot)
    } else {
        // -1 -> len, -len -> 1
        len.checked_sub(end.unsigned_abs()).map(|s| s + 1)
    }
}

/// A validated sub-range: `start < end <= len` and `step != 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedRange {
    /// First physical slot (inclusive).
    pub start: usize,
    /// Last physical slot (exclusive).
    pub end: usize,
    /// Signed stride; negative walks from the end towards the start.
    pub step: isize,
}

impl ResolvedRange {
    /// Validate and resolve `start..end` with `step` against `len`.
    pub fn new(len: usize, start: isize, end: isize, step: isize) -> Result<Self, SliceError> {
        if step == 0 {
            return Err(SliceError::ZeroStep);
        }
        let out_of_bounds = || SliceError::RangeOutOfBounds { start, end, len };
        let first = resolve_index(len, start).ok_or_else(out_of_bounds)?;
        let last = resolve_end(len, end).ok_or_else(out_of_bounds)?;
        if first >= last {
            return Err(SliceError::EmptyRange {
                start: first,
                end: last,
            });
        }
        Ok(Self {
            start: first,
            end: last,
            step,
        })
    }

    /// Initial capacity for the result container.
    ///
    /// This is the span of the range, not the number of visited slots.
    pub fn capacity_hint(&self) -> usize {
        self.end - self.start
    }

    /// Number of slots the walk visits.
    pub fn visit_count(&self) -> usize {
        (self.end - self.start - 1) / self.step.unsigned_abs() + 1
    }

    /// Physical slots in visiting order.
    pub fn walk(&self) -> RangeWalk {
        let next = if self.step > 0 {
            self.start
        } else {
            self.end - 1
        };
        RangeWalk {
            next: Some(next),
            remaining: self.visit_count(),
            start: self.start,
            end: self.end,
            stride: self.step.unsigned_abs(),
            reverse: self.step < 0,
        }
    }
}

/// Iterator over the physical slots of a [`ResolvedRange`].
#[derive(Clone, Debug)]
pub struct RangeWalk {
    next: Option<usize>,
    remaining: usize,
    start: usize,
    end: usize,
    stride: usize,
    reverse: bool,
}

impl Iterator for RangeWalk {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        self.next = if self.reverse {
            current
                .checked_sub(self.stride)
                .filter(|&slot| slot >= self.start)
        } else {
            current
                .checked_add(self.stride)
                .filter(|&slot| slot < self.end)
        };
        self.remaining = self.remaining.saturating_sub(1);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for RangeWalk {}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(len: usize, start: isize, end: isize, step: isize) -> Vec<usize> {
        ResolvedRange::new(len, start, end, step).unwrap().walk().collect()
    }

    #[test]
    fn positive_index_within_len() {
        assert_eq!(resolve_index(5, 0), Some(0));
        assert_eq!(resolve_index(5, 4), Some(4));
        assert_eq!(resolve_index(5, 5), None);
    }

    #[test]
    fn negative_index_counts_from_tail() {
        assert_eq!(resolve_index(5, -1), Some(4));
        assert_eq!(resolve_index(5, -5), Some(0));
        assert_eq!(resolve_index(5, -6), None);
    }

    #[test]
    fn empty_len_resolves_nothing() {
        assert_eq!(resolve_index(0, 0), None);
        assert_eq!(resolve_index(0, -1), None);
    }

    #[test]
    fn negative_end_is_inclusive() {
        let r = ResolvedRange::new(5, 0, -1, 1).unwrap();
        assert_eq!((r.start, r.end), (0, 5));
        let r = ResolvedRange::new(5, 0, -5, 1).unwrap();
        assert_eq!((r.start, r.end), (0, 1));
    }

    #[test]
    fn forward_stride() {
        assert_eq!(walk(6, 0, 6, 2), vec![0, 2, 4]);
        assert_eq!(walk(6, 1, 6, 2), vec![1, 3, 5]);
        assert_eq!(walk(6, 0, 6, 10), vec![0]);
    }

    #[test]
    fn reverse_stride_starts_at_end() {
        assert_eq!(walk(6, 0, 6, -1), vec![5, 4, 3, 2, 1, 0]);
        assert_eq!(walk(6, 0, 6, -2), vec![5, 3, 1]);
        assert_eq!(walk(6, 2, -1, -3), vec![5, 2]);
    }

    #[test]
    fn visit_count_matches_walk() {
        for len in 1..8usize {
            for step in [-3isize, -2, -1, 1, 2, 3] {
                let r = ResolvedRange::new(len, 0, len as isize, step).unwrap();
                assert_eq!(r.visit_count(), r.walk().count());
            }
        }
    }

    #[test]
    fn walk_reports_exact_len() {
        let mut w = ResolvedRange::new(7, 1, -1, 3).unwrap().walk();
        assert_eq!(w.len(), 2);
        assert_eq!(w.next(), Some(1));
        assert_eq!(w.len(), 1);
        assert_eq!(w.next(), Some(4));
        assert_eq!(w.len(), 0);
        assert_eq!(w.next(), None);
    }

    #[test]
    fn zero_step_rejected() {
        assert_eq!(ResolvedRange::new(5, 0, 5, 0), Err(SliceError::ZeroStep));
    }

    #[test]
    fn start_equal_to_len_rejected() {
        assert!(matches!(
            ResolvedRange::new(5, 5, 5, 1),
            Err(SliceError::RangeOutOfBounds { .. })
        ));
    }

    #[test]
    fn end_past_len_rejected() {
        assert!(matches!(
            ResolvedRange::new(5, 0, 6, 1),
            Err(SliceError::RangeOutOfBounds { .. })
        ));
        assert!(matches!(
            ResolvedRange::new(5, 0, -6, 1),
            Err(SliceError::RangeOutOfBounds { .. })
        ));
    }

    #[test]
    fn equal_or_inverted_bounds_rejected() {
        assert_eq!(
            ResolvedRange::new(5, 2, 2, 1),
            Err(SliceError::EmptyRange { start: 2, end: 2 })
        );
        assert!(matches!(
            ResolvedRange::new(5, 4, 1, -1),
            Err(SliceError::EmptyRange { .. })
        ));
        // -1 as start resolves to 4, -2 as end resolves to 4.
        assert!(matches!(
            ResolvedRange::new(5, -1, -2, 1),
            Err(SliceError::EmptyRange { .. })
        ));
    }

    #[test]
    fn empty_source_rejects_every_range() {
        assert!(ResolvedRange::new(0, 0, 0, 1).is_err());
        assert!(ResolvedRange::new(0, -1, 0, 1).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn negative_index_mirrors_positive(
                (len, k) in (1usize..64).prop_flat_map(|len| (Just(len), 1..=len)),
            ) {
                prop_assert_eq!(
                    resolve_index(len, -(k as isize)),
                    resolve_index(len, (len - k) as isize)
                );
            }

            #[test]
            fn walk_stays_in_bounds(
                len in 1usize..40,
                start in -40isize..40,
                end in -40isize..41,
                step in -5isize..6,
            ) {
                if let Ok(r) = ResolvedRange::new(len, start, end, step) {
                    for slot in r.walk() {
                        prop_assert!(slot >= r.start && slot < r.end);
                    }
                }
            }

            #[test]
            fn reverse_walk_is_mirror_for_unit_step(
                (len, a, b) in (1usize..40)
                    .prop_flat_map(|len| (Just(len), 0..len))
                    .prop_flat_map(|(len, a)| (Just(len), Just(a), a + 1..=len)),
            ) {
                let fwd: Vec<_> = ResolvedRange::new(len, a as isize, b as isize, 1).unwrap().walk().collect();
                let mut back: Vec<_> = ResolvedRange::new(len, a as isize, b as isize, -1).unwrap().walk().collect();
                back.reverse();
                prop_assert_eq!(fwd, back);
            }

            #[test]
            fn strided_walk_len_matches_visits(
                (len, a, b) in (1usize..40)
                    .prop_flat_map(|len| (Just(len), 0..len))
                    .prop_flat_map(|(len, a)| (Just(len), Just(a), a + 1..=len)),
                step in prop_oneof![-5isize..=-1, 1isize..=5],
            ) {
                let r = ResolvedRange::new(len, a as isize, b as isize, step).unwrap();
                let walk = r.walk();
                let expected = walk.len();
                prop_assert_eq!(expected, (b - a - 1) / step.unsigned_abs() + 1);
                prop_assert_eq!(walk.count(), expected);
            }
        }
    }
}
