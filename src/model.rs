//! Data exchanged with the subspace solver.

use serde::{Deserialize, Deserializer, Serialize};

/// Shape of the analysed matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Dimensions {
    pub m: usize,
    pub n: usize,
    pub rank: usize,
}

impl Dimensions {
    pub fn nullity(&self) -> usize {
        self.n.saturating_sub(self.rank)
    }
}


/// Basis of one subspace as sent by the solver.
///
/// The solver is not consistent about nesting, so the shape is resolved here
/// once instead of being sniffed during rendering.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Basis {
    VectorList(Vec<Vec<f64>>),
    SingleVector(Vec<f64>),
    /// Anything else. Rendered as nothing.
    Malformed(serde_json::Value),
}

impl Default for Basis {
    fn default() -> Self {
        Basis::VectorList(Vec::new())
    }
}

impl Basis {
    /// Basis vectors in order. A flat vector counts as a one-element list.
    pub fn vectors(&self) -> Vec<&[f64]> {
        match self {
            Basis::VectorList(list) => list.iter().map(Vec::as_slice).collect(),
            Basis::SingleVector(v) if v.is_empty() => Vec::new(),
            Basis::SingleVector(v) => vec![v.as_slice()],
            Basis::Malformed(_) => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vectors().is_empty()
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Basis::Malformed(_))
    }
}


#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SubspaceDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dimension: usize,
    /// Dimension of the surrounding space. Accepts `3` as well as `"R^3"`.
    #[serde(default, deserialize_with = "deserialize_ambient")]
    pub ambient: Option<usize>,
    #[serde(default)]
    pub basis: Basis,
}

fn deserialize_ambient<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Count(usize),
        Label(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Count(k) => Some(k),
        Repr::Label(s) => s.trim().strip_prefix("R^").and_then(|k| k.parse().ok()),
        Repr::Other(_) => None,
    })
}


/// Everything the solver reports about one matrix.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalculationResult {
    pub dimensions: Dimensions,
    #[serde(default, deserialize_with = "deserialize_descriptor")]
    pub column_space: SubspaceDescriptor,
    #[serde(default, deserialize_with = "deserialize_descriptor")]
    pub null_space: SubspaceDescriptor,
    #[serde(default, deserialize_with = "deserialize_descriptor")]
    pub row_space: SubspaceDescriptor,
    #[serde(default, deserialize_with = "deserialize_descriptor")]
    pub left_null_space: SubspaceDescriptor,
}

/// A descriptor that does not parse is replaced by an empty one so that the
/// other three subspaces can still be drawn.
fn deserialize_descriptor<'de, D>(deserializer: D) -> Result<SubspaceDescriptor, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        log::warn!("ignoring malformed subspace descriptor: {e}");
        SubspaceDescriptor::default()
    }))
}

impl CalculationResult {
    pub fn descriptor(&self, role: SubspaceRole) -> &SubspaceDescriptor {
        match role {
            SubspaceRole::Column => &self.column_space,
            SubspaceRole::Null => &self.null_space,
            SubspaceRole::Row => &self.row_space,
            SubspaceRole::LeftNull => &self.left_null_space,
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubspaceRole {
    Column,
    Null,
    Row,
    LeftNull,
}

impl SubspaceRole {
    /// Render order.
    pub const ALL: [SubspaceRole; 4] = [
        SubspaceRole::Column,
        SubspaceRole::Null,
        SubspaceRole::Row,
        SubspaceRole::LeftNull,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SubspaceRole::Column => "column",
            SubspaceRole::Null => "null",
            SubspaceRole::Row => "row",
            SubspaceRole::LeftNull => "left-null",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SubspaceRole::Column => "Column Space C(A)",
            SubspaceRole::Null => "Null Space N(A)",
            SubspaceRole::Row => "Row Space C(Aᵀ)",
            SubspaceRole::LeftNull => "Left Null Space N(Aᵀ)",
        }
    }

    /// Row space and left null space share the origin with the other two, so
    /// they are drawn slightly shifted.
    pub fn is_offset(self) -> bool {
        matches!(self, SubspaceRole::Row | SubspaceRole::LeftNull)
    }

    /// Null spaces are only drawn when the reported dimension is nonzero; the
    /// solver sends a placeholder zero basis for trivial null spaces.
    pub fn requires_positive_dimension(self) -> bool {
        matches!(self, SubspaceRole::Null | SubspaceRole::LeftNull)
    }
}


#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("matrix has no entries")]
    Empty,
    #[error("row {row} has {found} entries, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Body of a calculation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationRequest {
    matrix: Vec<Vec<f64>>,
}

impl CalculationRequest {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(MatrixError::Empty);
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(MatrixError::Ragged {
                row,
                expected,
                found: r.len(),
            });
        }
        Ok(Self { matrix: rows })
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.matrix
    }
}
