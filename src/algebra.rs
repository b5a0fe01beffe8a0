//! ## Set algebra
//! Union and intersection cardinality estimates over several sketches.
//!
//! Union is exact at the register level: merging sketches gives the same registers as adding
//! every element of every input into one sketch. Intersection has no register-level form and is
//! estimated by inclusion-exclusion over the unions of all `2^n - 1` non-empty subsets of inputs:
//!
//! `|A ∩ B| = |A| + |B| - |A ∪ B|`
//!
//! Accuracy caveat: every union term carries its own estimation error and the terms are summed with
//! alternating signs, so the error of an intersection estimate grows with the number of inputs and is
//! not tightly bounded. Estimates may even be negative. The cost is `O(2^n * M)`.

use tracing::warn;

use crate::sketch::Sketch;

/// Intersections over more sets than this log a warning about their exponential cost
pub const INTERSECTION_WARN_SETS: usize = 8;
/// Largest number of sets subset masks can enumerate
pub const MAX_INTERSECTION_SETS: usize = 63;

/// Return cardinality estimate of the union of given sketches.
///
/// `None` inputs are empty sets and contribute nothing, an empty input yields `0`.
pub fn union_cardinality<'a, const B: usize, I>(sketches: I) -> u64
where
    I: IntoIterator<Item = Option<&'a Sketch<B>>>,
{
    let mut scratch = Sketch::new();
    union_into(&mut scratch, sketches)
}

/// Reset `scratch`, merge all present sketches into it and return its cardinality estimate.
///
/// Allows repeated union computations without reallocating the result sketch.
pub fn union_into<'a, const B: usize, I>(scratch: &mut Sketch<B>, sketches: I) -> u64
where
    I: IntoIterator<Item = Option<&'a Sketch<B>>>,
{
    scratch.reset();
    for sketch in sketches.into_iter().flatten() {
        scratch.merge(sketch);
    }
    scratch.cardinality()
}

/// Return cardinality estimate of the intersection of given sketches.
///
/// Any `None` input is an empty set, which makes the whole intersection empty and yields `0`.
/// Without inputs the alternating sum is empty and also yields `0`.
///
/// # Panics
/// Panics if more than [`MAX_INTERSECTION_SETS`] sketches are given and none of them is missing.
pub fn intersection_cardinality<const B: usize>(sketches: &[Option<&Sketch<B>>]) -> i64 {
    if sketches.iter().any(Option::is_none) {
        return 0;
    }
    let n = sketches.len();
    assert!(
        n <= MAX_INTERSECTION_SETS,
        "intersection of {} sets exceeds the supported {}",
        n,
        MAX_INTERSECTION_SETS
    );
    if n > INTERSECTION_WARN_SETS {
        warn!(sets = n, terms = (1u64 << n) - 1, "intersection estimate with exponential cost");
    }

    let mut scratch = Sketch::new();
    let mut sum = 0i64;
    for subset in 1..(1u64 << n) {
        let members = sketches
            .iter()
            .enumerate()
            .map(|(j, &sketch)| if subset & (1 << j) != 0 { sketch } else { None });
        let union = union_into(&mut scratch, members) as i64;
        // odd-sized subsets are added, even-sized ones subtracted
        if subset.count_ones() % 2 == 1 {
            sum += union;
        } else {
            sum -= union;
        }
    }

    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn sketch_of<'a>(items: impl IntoIterator<Item = &'a str>) -> Sketch {
        let mut s = Sketch::new();
        for item in items {
            let _ = s.add(item.as_bytes());
        }
        s
    }

    fn sketch_of_range(range: std::ops::Range<u64>) -> Sketch {
        let mut s = Sketch::new();
        for i in range {
            let _ = s.add(&i.to_le_bytes());
        }
        s
    }

    #[test]
    fn test_union_of_nothing() {
        assert_eq!(union_cardinality::<11, _>([]), 0);
        assert_eq!(union_cardinality::<11, _>([None, None]), 0);
    }

    #[test]
    fn test_union_ignores_missing() {
        let x = sketch_of(["a", "b", "c"]);
        assert_eq!(union_cardinality([Some(&x), None]), 3);
        assert_eq!(union_cardinality([None, Some(&x), None]), 3);
    }

    #[test]
    fn test_union_and_intersection_of_overlapping_sets() {
        let x = sketch_of(["a", "b", "c"]);
        let y = sketch_of(["c", "d", "e"]);
        assert_eq!(union_cardinality([Some(&x), Some(&y)]), 5);
        assert_eq!(intersection_cardinality(&[Some(&x), Some(&y)]), 1);
    }

    #[test]
    fn test_union_lower_bound() {
        let pairs = [(0..100, 50..5000), (0..20_000, 0..10), (0..3000, 3000..6000)];
        for (lhs, rhs) in pairs {
            let a = sketch_of_range(lhs);
            let b = sketch_of_range(rhs);
            let union = union_cardinality([Some(&a), Some(&b)]);
            assert!(union >= a.cardinality().max(b.cardinality()));
        }
    }

    #[test]
    fn test_union_into_reuses_scratch() {
        let a = sketch_of_range(0..1000);
        let b = sketch_of_range(0..10);
        let mut scratch = Sketch::new();
        let first = union_into(&mut scratch, [Some(&a)]);
        assert_eq!(first, a.cardinality());
        // a previous union must not leak into the next one
        assert_eq!(union_into(&mut scratch, [Some(&b)]), 10);
        assert_eq!(scratch, b);
    }

    #[test]
    fn test_intersection_with_missing_set() {
        let x = sketch_of(["a", "b", "c"]);
        assert_eq!(intersection_cardinality(&[Some(&x), None]), 0);
        assert_eq!(intersection_cardinality(&[None, Some(&x), Some(&x)]), 0);
        assert_eq!(intersection_cardinality::<11>(&[]), 0);
    }

    #[test_case(1; "single set")]
    #[test_case(2; "two copies")]
    #[test_case(3; "three copies")]
    #[test_case(5; "five copies")]
    fn test_self_intersection(copies: usize) {
        for sketch in [
            sketch_of(["apple", "banana", "cherry"]),
            sketch_of_range(0..10_000),
        ] {
            let inputs = vec![Some(&sketch); copies];
            assert_eq!(intersection_cardinality(&inputs), sketch.cardinality() as i64);
        }
    }

    #[test_case(0..1000, 1000..2000 => -22; "disjoint small")]
    #[test_case(0..10_000, 10_000..20_000 => -307; "disjoint large")]
    #[test_case(0..1000, 500..1500 => 477; "half overlap")]
    #[test_case(0..10_000, 5000..15_000 => 4089; "large half overlap")]
    #[test_case(0..10_000, 0..100 => 100; "subset")]
    fn test_intersection_of_two(lhs: std::ops::Range<u64>, rhs: std::ops::Range<u64>) -> i64 {
        let a = sketch_of_range(lhs);
        let b = sketch_of_range(rhs);
        intersection_cardinality(&[Some(&a), Some(&b)])
    }

    #[test]
    fn test_intersection_of_three() {
        let a = sketch_of_range(0..3000);
        let b = sketch_of_range(1000..4000);
        let c = sketch_of_range(2000..5000);
        assert_eq!(intersection_cardinality(&[Some(&a), Some(&b), Some(&c)]), 966);
    }

    #[test]
    fn test_intersection_of_many_sets() {
        let sketches: Vec<Sketch> = (0..10).map(|_| sketch_of_range(0..500)).collect();
        let inputs: Vec<Option<&Sketch>> = sketches.iter().map(Some).collect();
        assert_eq!(intersection_cardinality(&inputs), sketches[0].cardinality() as i64);
    }

    #[test]
    #[should_panic(expected = "exceeds the supported")]
    fn test_intersection_of_too_many_sets() {
        let sketch = Sketch::<11>::new();
        let inputs = vec![Some(&sketch); MAX_INTERSECTION_SETS + 1];
        intersection_cardinality(&inputs);
    }

    #[test]
    fn test_missing_set_short_circuits_size_limit() {
        let sketch = sketch_of(["a", "b", "c"]);
        let mut inputs = vec![Some(&sketch); MAX_INTERSECTION_SETS + 1];
        inputs[0] = None;
        assert_eq!(intersection_cardinality(&inputs), 0);
    }
}
