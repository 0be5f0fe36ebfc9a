#![allow(dead_code)]

use std::path::{Path, PathBuf};

use mat2json::data::model::{MatrixSet, NamedArray};
use mat2json::data::writer::write_mat;
use ndarray::{ArrayD, IxDyn};

pub fn identity() -> ArrayD<f64> {
    ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![1.0, 0.0, 0.0, 1.0]).unwrap()
}

pub fn zeros(shape: &[usize]) -> ArrayD<f64> {
    ArrayD::zeros(IxDyn(shape))
}

/// Write a `.mat` file named `name` in `dir` holding the given variables.
pub fn write_fixture(dir: &Path, name: &str, vars: Vec<(&str, ArrayD<f64>)>) -> PathBuf {
    let set: MatrixSet = vars
        .into_iter()
        .map(|(n, v)| NamedArray::new(n, v))
        .collect();
    let path = dir.join(name);
    write_mat(&path, &set).unwrap();
    path
}

/// `g` = identity, `H` = 2×2×3 zeros.
pub fn write_identity_fixture(dir: &Path, name: &str) -> PathBuf {
    write_fixture(dir, name, vec![("g", identity()), ("H", zeros(&[2, 2, 3]))])
}
