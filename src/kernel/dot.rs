//! Dense dot product primitive

use crate::core::DotBackend;

/// Dot product of two equally long dense vectors
///
/// # Panics
/// Panics if `x` and `y` differ in length
#[inline]
pub fn dot(x: &[f64], y: &[f64], backend: DotBackend) -> f64 {
    assert_eq!(
        x.len(),
        y.len(),
        "Feature vectors must have the same dimensionality"
    );

    match backend {
        DotBackend::Manual => dot_manual(x, y),
        DotBackend::Unrolled => dot_unrolled(x, y),
    }
}

fn dot_manual(x: &[f64], y: &[f64]) -> f64 {
    let mut result = 0.0;
    for (a, b) in x.iter().zip(y) {
        result += a * b;
    }
    result
}

fn dot_unrolled(x: &[f64], y: &[f64]) -> f64 {
    let mut acc = [0.0f64; 4];
    let x_chunks = x.chunks_exact(4);
    let y_chunks = y.chunks_exact(4);
    let x_rest = x_chunks.remainder();
    let y_rest = y_chunks.remainder();

    for (a, b) in x_chunks.zip(y_chunks) {
        acc[0] += a[0] * b[0];
        acc[1] += a[1] * b[1];
        acc[2] += a[2] * b[2];
        acc[3] += a[3] * b[3];
    }

    let tail: f64 = x_rest.iter().zip(y_rest).map(|(a, b)| a * b).sum();
    (acc[0] + acc[1]) + (acc[2] + acc[3]) + tail
}
