use std::path::PathBuf;

use anyhow::Result;
use ndarray::{ArrayD, IxDyn};

use mat2json::data::model::{MatrixSet, NamedArray};
use mat2json::data::writer::write_mat;

/// Number of matrices in the sample `H` stack.
const STACK_DEPTH: usize = 3;

fn main() -> Result<()> {
    mat2json::logging::init();

    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample.mat"));

    // Half-scale rotation by 30 degrees.
    let (s, c) = std::f64::consts::FRAC_PI_6.sin_cos();
    let g = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![0.5 * c, -0.5 * s, 0.5 * s, 0.5 * c])?;

    // Slice k translates by k along x: [[1, 0, k], [0, 1, 0]].
    let h = ArrayD::from_shape_fn(IxDyn(&[2, 3, STACK_DEPTH]), |ix| match (ix[0], ix[1]) {
        (0, 0) | (1, 1) => 1.0,
        (0, 2) => ix[2] as f64,
        _ => 0.0,
    });

    let set = MatrixSet::new(vec![NamedArray::new("g", g), NamedArray::new("H", h)]);
    write_mat(&output_path, &set)?;

    println!(
        "Wrote g (2x2) and H (2x3x{STACK_DEPTH}) to {}",
        output_path.display()
    );
    Ok(())
}
