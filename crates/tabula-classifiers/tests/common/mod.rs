//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Write a synthetic `x_1..x_4,target` CSV with `rows` rows.
///
/// `x_1` sits around 425 and is occasionally missing, a few targets are
/// missing, and the label depends on `x_1`, `x_2` and `x_3` plus noise so both
/// classes appear in any reasonably sized subset.
pub fn write_synthetic_csv(dir: &Path, name: &str, rows: usize, seed: u64) -> PathBuf {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::from("x_1,x_2,x_3,x_4,target\n");
    for _ in 0..rows {
        let x1: f64 = rng.gen_range(400.0..450.0);
        let x2: f64 = rng.gen_range(-1.0..1.0);
        let x3: f64 = rng.gen_range(-1.0..1.0);
        let x4: f64 = rng.gen_range(-1.0..1.0);
        let noise: f64 = rng.gen_range(-0.8..0.8);
        let signal = 0.04 * (x1 - 425.0) + 1.5 * x2 - x3 + noise;
        let target = if signal > 0.0 { "1" } else { "0" };

        let x1_cell = if rng.gen_bool(0.05) {
            String::new()
        } else {
            format!("{:.4}", x1)
        };
        let target_cell = if rng.gen_bool(0.02) { "" } else { target };
        let _ = writeln!(
            out,
            "{},{:.4},{:.4},{:.4},{}",
            x1_cell, x2, x3, x4, target_cell
        );
    }

    let path = dir.join(name);
    std::fs::write(&path, out).expect("failed to write synthetic dataset");
    path
}

/// Write literal CSV content.
pub fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("failed to write dataset");
    path
}
