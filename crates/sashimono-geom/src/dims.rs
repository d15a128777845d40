//! Box dimension types, in millimeters.

use super::Axis;
use serde::{Deserialize, Serialize};

/// A lumber cross-section: width by height in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Extent along the width axis.
    pub width: f64,
    /// Extent along the height axis.
    pub height: f64,
}

/// The full local bounding box of a piece.
///
/// Occupies `[0, length] x [0, width] x [0, height]` in the local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDims {
    /// Extent along the width axis (Y).
    pub width: f64,
    /// Extent along the height axis (Z).
    pub height: f64,
    /// Extent along the length axis (X).
    pub length: f64,
}

impl BoxDims {
    /// Combine a cross-section with a length.
    pub fn of(section: Section, length: f64) -> Self {
        Self {
            width: section.width,
            height: section.height,
            length,
        }
    }

    /// Extent of the box along one local axis.
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Length => self.length,
            Axis::Width => self.width,
            Axis::Height => self.height,
        }
    }
}
