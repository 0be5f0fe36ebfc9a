use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

/// Variables whose name starts with this prefix carry file metadata
/// (`__header__`, `__version__`, `__globals__`) rather than data.
pub const METADATA_PREFIX: &str = "__";

// ---------------------------------------------------------------------------
// NamedArray – one variable of a matrix file
// ---------------------------------------------------------------------------

/// A single named N-dimensional array loaded from a matrix file.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArray {
    pub name: String,
    /// Values indexed logically as `[row, col, page, ...]`.
    pub values: ArrayD<f64>,
}

impl NamedArray {
    pub fn new(name: impl Into<String>, values: ArrayD<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn rank(&self) -> usize {
        self.values.ndim()
    }

    /// Whether this entry is file metadata and must be ignored.
    pub fn is_metadata(&self) -> bool {
        self.name.starts_with(METADATA_PREFIX)
    }
}

// ---------------------------------------------------------------------------
// MatrixSet – the complete loaded file
// ---------------------------------------------------------------------------

/// All variables of one matrix file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixSet {
    pub arrays: Vec<NamedArray>,
}

impl MatrixSet {
    pub fn new(arrays: Vec<NamedArray>) -> Self {
        Self { arrays }
    }

    /// Append a variable, keeping file order.
    pub fn push(&mut self, array: NamedArray) {
        self.arrays.push(array);
    }

    /// Look up a variable by exact name. Later duplicates win.
    pub fn get(&self, name: &str) -> Option<&NamedArray> {
        self.arrays.iter().rev().find(|a| a.name == name)
    }

    /// Non-metadata variables, in file order.
    pub fn variables(&self) -> impl Iterator<Item = &NamedArray> {
        self.arrays.iter().filter(|a| !a.is_metadata())
    }

    /// Names of the non-metadata variables.
    pub fn names(&self) -> Vec<String> {
        self.variables().map(|a| a.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }
}

impl FromIterator<NamedArray> for MatrixSet {
    fn from_iter<I: IntoIterator<Item = NamedArray>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// ExtractionResult – what the web page consumes
// ---------------------------------------------------------------------------

/// The `g` transformation matrix and the `H` stack, as plain numbers.
///
/// Serializes to:
///
/// ```json
/// { "g": [[1.0, 0.0], [0.0, 1.0]], "H": [[[0.0, 0.0], [0.0, 0.0]], ...] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub g: [[f64; 2]; 2],
    /// One 2D matrix per index of the source array's last axis.
    #[serde(rename = "H")]
    pub h: Vec<Vec<Vec<f64>>>,
}

impl ExtractionResult {
    /// `(rows, cols)` shared by every slice of `H`, if any.
    pub fn slice_dims(&self) -> Option<(usize, usize)> {
        self.h
            .first()
            .map(|m| (m.len(), m.first().map_or(0, |row| row.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn zeros(shape: &[usize]) -> ArrayD<f64> {
        ArrayD::zeros(IxDyn(shape))
    }

    #[test]
    fn metadata_names_are_hidden_from_variables() {
        let set: MatrixSet = [
            NamedArray::new("__header__", zeros(&[1, 1])),
            NamedArray::new("g", zeros(&[2, 2])),
            NamedArray::new("H", zeros(&[2, 2, 3])),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 3);
        assert_eq!(set.names(), vec!["g".to_string(), "H".to_string()]);
    }

    #[test]
    fn get_prefers_the_last_duplicate() {
        let mut set = MatrixSet::default();
        set.push(NamedArray::new("g", zeros(&[2, 2])));
        set.push(NamedArray::new("g", zeros(&[3, 3])));
        assert_eq!(set.get("g").map(|a| a.shape().to_vec()), Some(vec![3, 3]));
        assert!(set.get("missing").is_none());
    }

    #[test]
    fn result_serializes_h_with_uppercase_key() {
        let result = ExtractionResult {
            g: [[1.0, 0.0], [0.0, 1.0]],
            h: vec![vec![vec![0.0, 0.0], vec![0.0, 0.0]]],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("H").is_some());
        assert!(json.get("h").is_none());
        assert_eq!(result.slice_dims(), Some((2, 2)));
    }
}
