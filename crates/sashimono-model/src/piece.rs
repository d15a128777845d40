use std::fmt;

use serde::{Deserialize, Serialize};
use sashimono_geom::{BoxDims, Section};

use crate::ModelError;

/// Dimensioned-lumber cross sections, in actual (planed) millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LumberKind {
    /// Nominal 2x4: 89 mm wide, 38 mm high.
    #[serde(rename = "2x4")]
    TwoByFour,
    /// Nominal 1x4: 89 mm wide, 19 mm high.
    #[serde(rename = "1x4")]
    OneByFour,
}

impl LumberKind {
    /// Actual cross section for this kind.
    pub fn section(self) -> Section {
        match self {
            LumberKind::TwoByFour => Section {
                width: 89.0,
                height: 38.0,
            },
            LumberKind::OneByFour => Section {
                width: 89.0,
                height: 19.0,
            },
        }
    }

    /// Parse the conventional nominal-size name.
    pub fn of(name: &str) -> Result<Self, ModelError> {
        match name {
            "2x4" => Ok(LumberKind::TwoByFour),
            "1x4" => Ok(LumberKind::OneByFour),
            other => Err(ModelError::UnknownLumberKind(other.to_string())),
        }
    }
}

impl fmt::Display for LumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LumberKind::TwoByFour => write!(f, "2x4"),
            LumberKind::OneByFour => write!(f, "1x4"),
        }
    }
}

/// A single piece of lumber, cut to length.
///
/// The local frame puts the box at `[0, length] x [0, width] x [0, height]`
/// with X running along the grain. Pieces are immutable once created;
/// `name` identifies the piece throughout the graph and in findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// Unique name within an assembly.
    pub name: String,
    /// Cross-section kind.
    pub kind: LumberKind,
    /// Cut length along the grain, in millimetres.
    pub length: f64,
    /// Marks a piece that is deliberately unfastened (a shelf board, a
    /// loose top). Standalone pieces are exempt from connectivity and
    /// structural checks.
    #[serde(default)]
    pub standalone: bool,
}

impl Piece {
    /// Create a piece, rejecting non-positive or non-finite lengths.
    pub fn create(kind: LumberKind, length: f64, name: &str) -> Result<Self, ModelError> {
        if !length.is_finite() || length <= 0.0 {
            return Err(ModelError::InvalidDimension {
                name: name.to_string(),
                length,
            });
        }
        Ok(Self {
            name: name.to_string(),
            kind,
            length,
            standalone: false,
        })
    }

    /// Mark the piece as deliberately unfastened.
    pub fn standalone(mut self) -> Self {
        self.standalone = true;
        self
    }

    /// Bounding-box dimensions of this piece in its local frame.
    pub fn dims(&self) -> BoxDims {
        BoxDims::of(self.kind.section(), self.length)
    }
}
