#![no_main]

use kset::Sketch;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut sketch) = Sketch::<11>::try_from(data) {
        assert_eq!(sketch.registers(), data);
        let _ = sketch.add(b"item");
        assert!(sketch.cardinality() > 0);
    }
    if let Ok(mut sketch) = serde_json::from_slice::<Sketch<11>>(data) {
        let _ = sketch.add(b"item");
        assert!(sketch.cardinality() > 0);
    }
});
