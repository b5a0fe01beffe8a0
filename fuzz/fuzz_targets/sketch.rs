#![no_main]

use kset::{intersection_cardinality, union_cardinality, Sketch};
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let split_index = wyhash(data, 0) as usize % data.len();
    let (first_half, second_half) = data.split_at(split_index);

    let mut sketch1 = Sketch::<11>::new();
    for chunk in first_half.chunks(4) {
        if let Some(bucket) = sketch1.add(chunk) {
            assert!(bucket < Sketch::<11>::M);
        }
        assert!(sketch1.cardinality() > 0);
        assert!(sketch1.add(chunk).is_none());
    }

    let mut sketch2 = Sketch::<11>::new();
    for chunk in second_half.chunks(4) {
        let _ = sketch2.add(chunk);
        assert!(sketch2.cardinality() > 0);
    }

    let union = union_cardinality([Some(&sketch1), Some(&sketch2)]);
    assert_eq!(
        intersection_cardinality(&[Some(&sketch1), Some(&sketch1)]),
        sketch1.cardinality() as i64
    );

    let mut merged = sketch1.clone();
    merged.merge(&sketch2);
    assert_eq!(merged.cardinality(), union);
    assert!(merged.registers().iter().all(|&r| r <= Sketch::<11>::MAX_RANK));
});
