use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::{MatrixSet, NamedArray};

// MAT level-5 constants (little-endian layout).
const HEADER_TEXT_LEN: usize = 116;
const MAT_VERSION: u16 = 0x0100;
pub(crate) const MI_INT8: u32 = 1;
pub(crate) const MI_INT32: u32 = 5;
pub(crate) const MI_UINT32: u32 = 6;
pub(crate) const MI_DOUBLE: u32 = 9;
pub(crate) const MI_MATRIX: u32 = 14;
pub(crate) const MX_DOUBLE_CLASS: u32 = 6;

/// Write every non-metadata variable of `set` as an uncompressed MAT level-5
/// file holding real double arrays.
pub fn write_mat(path: &Path, set: &MatrixSet) -> Result<()> {
    let bytes = encode_mat(set)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

/// Encode `set` into MAT level-5 bytes.
pub fn encode_mat(set: &MatrixSet) -> Result<Vec<u8>> {
    let mut out = encode_header();
    for array in set.variables() {
        let matrix = encode_matrix(array)?;
        push_element(&mut out, MI_MATRIX, &matrix);
    }
    Ok(out)
}

/// The fixed 128-byte file header.
pub(crate) fn encode_header() -> Vec<u8> {
    let mut out = Vec::with_capacity(128);

    let mut text = format!(
        "MATLAB 5.0 MAT-file, Platform: {}, Created by: mat2json {}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    )
    .into_bytes();
    text.resize(HEADER_TEXT_LEN, b' ');
    out.extend_from_slice(&text);
    out.extend_from_slice(&[0u8; 8]);
    out.extend_from_slice(&MAT_VERSION.to_le_bytes());
    out.extend_from_slice(b"IM");
    out
}

fn encode_matrix(array: &NamedArray) -> Result<Vec<u8>> {
    if array.name.is_empty() || !array.name.is_ascii() {
        bail!("Variable name {:?} must be non-empty ASCII", array.name);
    }

    // MAT-files carry at least two dimensions.
    let mut dims = array.shape().to_vec();
    while dims.len() < 2 {
        dims.push(1);
    }

    let mut body = Vec::new();

    let mut flags = Vec::with_capacity(8);
    flags.extend_from_slice(&MX_DOUBLE_CLASS.to_le_bytes());
    flags.extend_from_slice(&0u32.to_le_bytes());
    push_element(&mut body, MI_UINT32, &flags);

    let mut dim_bytes = Vec::with_capacity(dims.len() * 4);
    for d in &dims {
        let d = i32::try_from(*d).context("dimension too large for a MAT-file")?;
        dim_bytes.extend_from_slice(&d.to_le_bytes());
    }
    push_element(&mut body, MI_INT32, &dim_bytes);

    push_element(&mut body, MI_INT8, array.name.as_bytes());

    // Reversing the axes makes logical iteration column-major.
    let mut real = Vec::with_capacity(array.values.len() * 8);
    for v in array.values.t().iter() {
        real.extend_from_slice(&v.to_le_bytes());
    }
    push_element(&mut body, MI_DOUBLE, &real);

    Ok(body)
}

/// Tag + payload, padded to an 8-byte boundary.
pub(crate) fn push_element(out: &mut Vec<u8>, data_type: u32, payload: &[u8]) {
    out.extend_from_slice(&data_type.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    let pad = (8 - payload.len() % 8) % 8;
    out.extend(std::iter::repeat(0u8).take(pad));
}
