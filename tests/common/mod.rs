#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use binphase::{constants::Phase, ParFile};
use camino::Utf8Path;

/// Parse one of the `.par` fixtures under `tests/data`.
pub fn load_fixture(name: &str) -> ParFile {
    let path = Utf8Path::new("tests/data").join(name);
    ParFile::from_path(&path).unwrap_or_else(|e| panic!("failed to load {path}: {e}"))
}

/// Distance between two phases on the unit circle.
pub fn phase_distance(a: Phase, b: Phase) -> f64 {
    let d = (a - b).rem_euclid(1.0);
    d.min(1.0 - d)
}

pub fn assert_phases_close(actual: &[Phase], expected: &[Phase], epsilon: f64) {
    assert_eq!(actual.len(), expected.len(), "phase count");
    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (0.0..1.0).contains(&a),
            "phase {i} = {a} outside [0, 1)"
        );
        assert_abs_diff_eq!(phase_distance(a, e), 0.0, epsilon = epsilon);
    }
}
