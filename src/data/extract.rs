use ndarray::Axis;
use thiserror::Error;

use super::model::{ExtractionResult, MatrixSet, NamedArray};

/// Exact variable name that always supplies `g` when it is 2×2.
pub const G_NAME: &str = "g";
/// Exact variable name that always supplies `H` when it is 3-dimensional.
pub const H_NAME: &str = "H";

/// Why `g` and `H` could not be pulled out of a matrix set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Fewer than two non-metadata variables.
    #[error("expected at least 2 variables (g and H), found {}: {found:?}", .found.len())]
    InsufficientData { found: Vec<String> },
    /// One of the two matrices was never identified.
    #[error("could not identify {missing}; available variables: {available:?}")]
    MissingVariable {
        missing: &'static str,
        available: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Shape classification
// ---------------------------------------------------------------------------

/// What an array can stand for, judged by shape alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// Exactly 2×2.
    G,
    /// Three dimensions with a leading dimension of 2 or 3.
    H,
    None,
}

impl Candidate {
    pub fn of(shape: &[usize]) -> Self {
        match shape {
            [2, 2] => Candidate::G,
            [2 | 3, _, _] => Candidate::H,
            _ => Candidate::None,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Identify `g` and `H` among the variables of `set`.
///
/// Shape matches are scanned in file order and the last one wins; a variable
/// named exactly `g` or `H` then overrides the shape-based pick, provided it
/// has a usable shape (2×2 for `g`, rank 3 for `H`).
pub fn extract(set: &MatrixSet) -> Result<ExtractionResult, ExtractError> {
    let available = set.names();
    if available.len() < 2 {
        return Err(ExtractError::InsufficientData { found: available });
    }

    let mut g: Option<&NamedArray> = None;
    let mut h: Option<&NamedArray> = None;
    for array in set.variables() {
        match Candidate::of(array.shape()) {
            Candidate::G => g = Some(array),
            Candidate::H => h = Some(array),
            Candidate::None => {}
        }
    }

    if let Some(named) = set.get(G_NAME) {
        if Candidate::of(named.shape()) == Candidate::G {
            g = Some(named);
        } else {
            log::warn!(
                "variable '{G_NAME}' has shape {:?}, expected [2, 2]; ignoring the name",
                named.shape()
            );
        }
    }
    if let Some(named) = set.get(H_NAME) {
        if named.rank() == 3 {
            h = Some(named);
        }
    }

    let (Some(g), Some(h)) = (g, h) else {
        let missing = match (g, h) {
            (None, None) => "g and H",
            (None, Some(_)) => "g",
            _ => "H",
        };
        return Err(ExtractError::MissingVariable { missing, available });
    };

    log::debug!("using '{}' as g and '{}' as H", g.name, h.name);
    Ok(ExtractionResult {
        g: to_2x2(g),
        h: slice_last_axis(h),
    })
}

fn to_2x2(array: &NamedArray) -> [[f64; 2]; 2] {
    let v = &array.values;
    [[v[[0, 0]], v[[0, 1]]], [v[[1, 0]], v[[1, 1]]]]
}

/// Slice `i` holds every element whose last-axis index is `i`, rows then columns.
fn slice_last_axis(array: &NamedArray) -> Vec<Vec<Vec<f64>>> {
    let last = Axis(array.rank() - 1);
    array
        .values
        .axis_iter(last)
        .map(|matrix| {
            matrix
                .outer_iter()
                .map(|row| row.iter().copied().collect())
                .collect()
        })
        .collect()
}
