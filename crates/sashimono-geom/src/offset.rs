//! Offset measurements along an edge.

use serde::{Deserialize, Serialize};

/// A distance along an edge, measured from either end.
///
/// Both forms name a physical point; `resolve` normalizes them to a single
/// canonical scalar (distance from the minimum end) as soon as the edge
/// length is known. Nothing downstream of anchor binding ever sees the
/// from-max form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "from", content = "mm", rename_all = "lowercase")]
pub enum Offset {
    /// Distance from the minimum end of the edge.
    FromMin(f64),
    /// Distance from the maximum end of the edge.
    FromMax(f64),
}

impl Offset {
    /// Canonical from-min scalar for an edge of the given length.
    pub fn resolve(&self, edge_length: f64) -> f64 {
        match *self {
            Offset::FromMin(v) => v,
            Offset::FromMax(v) => edge_length - v,
        }
    }
}
