use serde::Serialize;

use super::encoder::FEATURE_COUNT;

/// Static facts a scoring capability reports about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    pub name: String,
    pub input_features: usize,
    pub output_width: usize,
}

/// Capability that maps a batch of feature rows to an output tensor.
///
/// Implementations are shared across request handlers and must tolerate
/// concurrent calls.
pub trait ScoringModel: Send + Sync {
    fn descriptor(&self) -> ModelDescriptor;

    fn predict(&self, batch: &[[f64; FEATURE_COUNT]]) -> Result<ModelOutput, ModelFault>;
}

/// Failure raised by a scoring capability.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelFault {
    #[error("expected {expected} input features, model accepts {actual}")]
    InputShape { expected: usize, actual: usize },
    #[error("model produced {0}")]
    OutputShape(String),
    #[error("{0}")]
    Internal(String),
}

/// Raw output tensor, row-major, one row per input row.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ModelOutput {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ModelFault> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return Err(ModelFault::OutputShape("ragged output rows".to_string()));
        }

        let row_count = rows.len();
        let data = rows.into_iter().flatten().collect();
        Ok(Self {
            rows: row_count,
            cols,
            data,
        })
    }

    /// Convenience for the common single-row case.
    pub fn single(row: Vec<f64>) -> Self {
        let cols = row.len();
        Self {
            rows: 1,
            cols,
            data: row,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Number of values per row, i.e. what the interpreter dispatches on.
    pub fn cardinality(&self) -> usize {
        self.cols
    }

    /// The row describing the submitted record.
    pub fn first_row(&self) -> &[f64] {
        if self.rows == 0 {
            return &[];
        }
        &self.data[..self.cols]
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }

    /// Shape rendered the way array libraries print it, e.g. `(1, 5)`.
    pub fn shape_label(&self) -> String {
        format!("({}, {})", self.rows, self.cols)
    }
}
