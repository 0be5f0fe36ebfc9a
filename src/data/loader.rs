use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use matfile::{MatFile, NumericData};
use ndarray::{ArrayD, IxDyn, ShapeBuilder};

use super::model::{MatrixSet, NamedArray};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load every numeric variable of a matrix file.  Dispatch by extension.
///
/// Supported formats:
/// * `.mat` – MATLAB level-5 MAT-file (compressed or not)
pub fn load_file(path: &Path) -> Result<MatrixSet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "mat" => load_mat(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// MAT-file loader
// ---------------------------------------------------------------------------

/// MAT-files store arrays column-major with at least two dimensions.
/// Each numeric class is widened to `f64`; character, cell and struct
/// variables are not numeric and never reach the returned set.
fn load_mat(path: &Path) -> Result<MatrixSet> {
    let file = std::fs::File::open(path).context("opening MAT file")?;
    let mat = MatFile::parse(std::io::BufReader::new(file))
        .map_err(|e| anyhow!("parsing MAT file: {e:?}"))?;

    let mut set = MatrixSet::default();
    for array in mat.arrays() {
        let name = array.name();
        let values = numeric_to_f64(name, array.data())?;
        let values = column_major_array(array.size(), values)
            .with_context(|| format!("Variable '{name}': inconsistent dimensions"))?;
        log::debug!("loaded variable '{name}' with shape {:?}", values.shape());
        set.push(NamedArray::new(name, values));
    }

    Ok(set)
}

/// Build a logical `[row, col, page, ...]` array from column-major data.
pub(crate) fn column_major_array(dims: &[usize], values: Vec<f64>) -> Result<ArrayD<f64>> {
    let expected: usize = dims.iter().product();
    if expected != values.len() {
        bail!(
            "dimensions {dims:?} need {expected} values but {} were stored",
            values.len()
        );
    }
    Ok(ArrayD::from_shape_vec(IxDyn(dims).f(), values)?)
}

// -- Numeric class helpers --

macro_rules! widen_real {
    ($name:expr, $real:expr, $imag:expr) => {{
        if $imag.is_some() {
            bail!("Variable '{}': complex arrays are not supported", $name);
        }
        $real.iter().map(|&v| v as f64).collect::<Vec<f64>>()
    }};
}

fn numeric_to_f64(name: &str, data: &NumericData) -> Result<Vec<f64>> {
    let values = match data {
        NumericData::Double { real, imag } => widen_real!(name, real, imag),
        NumericData::Single { real, imag } => widen_real!(name, real, imag),
        NumericData::Int8 { real, imag } => widen_real!(name, real, imag),
        NumericData::UInt8 { real, imag } => widen_real!(name, real, imag),
        NumericData::Int16 { real, imag } => widen_real!(name, real, imag),
        NumericData::UInt16 { real, imag } => widen_real!(name, real, imag),
        NumericData::Int32 { real, imag } => widen_real!(name, real, imag),
        NumericData::UInt32 { real, imag } => widen_real!(name, real, imag),
        NumericData::Int64 { real, imag } => widen_real!(name, real, imag),
        NumericData::UInt64 { real, imag } => widen_real!(name, real, imag),
    };
    Ok(values)
}
