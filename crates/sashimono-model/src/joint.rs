use serde::{Deserialize, Serialize};

/// Fastening metadata attached to a connection.
///
/// Joint kinds never influence pose resolution; they feed joint-quality
/// validation and downstream drawing or cut-list generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JointKind {
    /// Plain butt joint, fastened externally (screws, glue).
    Butt,
    /// Hidden dowel joint. Radius and depth describe the hole drilled
    /// into each mating piece.
    Dowel {
        /// Dowel hole radius in millimetres.
        radius_mm: f64,
        /// Hole depth per piece in millimetres (half the dowel length).
        depth_mm: f64,
    },
}

impl JointKind {
    /// Dowel joint sized for the given dowel stock.
    pub fn from_dowel(spec: DowelSpec) -> Self {
        JointKind::Dowel {
            radius_mm: spec.diameter_mm / 2.0,
            depth_mm: spec.length_mm / 2.0,
        }
    }
}

impl Default for JointKind {
    fn default() -> Self {
        JointKind::Butt
    }
}

/// Commercial dowel stock, named diameter x length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DowelSpec {
    /// Stock diameter in millimetres.
    pub diameter_mm: f64,
    /// Stock length in millimetres.
    pub length_mm: f64,
}

/// Commonly stocked hardwood dowel sizes.
pub const DOWEL_PRESETS: [DowelSpec; 8] = [
    DowelSpec {
        diameter_mm: 6.0,
        length_mm: 25.0,
    },
    DowelSpec {
        diameter_mm: 6.0,
        length_mm: 30.0,
    },
    DowelSpec {
        diameter_mm: 8.0,
        length_mm: 25.0,
    },
    DowelSpec {
        diameter_mm: 8.0,
        length_mm: 30.0,
    },
    DowelSpec {
        diameter_mm: 8.0,
        length_mm: 40.0,
    },
    DowelSpec {
        diameter_mm: 10.0,
        length_mm: 30.0,
    },
    DowelSpec {
        diameter_mm: 10.0,
        length_mm: 40.0,
    },
    DowelSpec {
        diameter_mm: 12.0,
        length_mm: 40.0,
    },
];

/// Look up a preset by diameter and length, if stocked.
pub fn dowel_preset(diameter_mm: f64, length_mm: f64) -> Option<DowelSpec> {
    DOWEL_PRESETS
        .iter()
        .copied()
        .find(|s| s.diameter_mm == diameter_mm && s.length_mm == length_mm)
}
