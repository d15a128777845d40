//! Edges and corners of the lumber box.

use super::{BoxDims, Face, GeomError};
use sashimono_math::{Point3, Vec3};
use serde::{Deserialize, Serialize};

/// One of the twelve edges of the box, named by its two adjacent faces.
///
/// The pair is ordered: the edge direction is the normal of
/// `lhs.cross(rhs)` (right-hand rule), so `Edge(top, front)` and
/// `Edge(front, top)` name the same line with opposite directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    lhs: Face,
    rhs: Face,
}

impl Edge {
    /// Create an edge from two adjacent faces.
    ///
    /// Fails when the faces are identical or mutually opposite — no such
    /// edge exists on the box.
    pub fn new(lhs: Face, rhs: Face) -> Result<Self, GeomError> {
        if !lhs.is_adjacent(rhs) {
            return Err(GeomError::InvalidEdge { lhs, rhs });
        }
        Ok(Self { lhs, rhs })
    }

    /// The canonical positive-direction edge for an anchor's
    /// (contact face, edge-shared face) pair.
    ///
    /// Orders the pair so the edge direction points along a positive local
    /// axis; offsets measured on this edge are "from-min" scalars.
    pub fn oriented(contact: Face, edge_shared: Face) -> Result<Self, GeomError> {
        let edge = Self::new(contact, edge_shared)?;
        if edge.cross_face().is_positive() {
            Ok(edge)
        } else {
            Ok(Self {
                lhs: edge_shared,
                rhs: contact,
            })
        }
    }

    /// First face of the ordered pair.
    pub fn lhs(&self) -> Face {
        self.lhs
    }

    /// Second face of the ordered pair.
    pub fn rhs(&self) -> Face {
        self.rhs
    }

    /// The face along whose axis this edge runs: `lhs.cross(rhs)`.
    pub fn cross_face(&self) -> Face {
        // Adjacency is guaranteed at construction, so the cross exists.
        self.lhs
            .cross(self.rhs)
            .expect("adjacent faces always have a cross face")
    }

    /// Unit direction of the edge in the local frame.
    pub fn direction(&self) -> Vec3 {
        self.cross_face().normal()
    }

    /// The corner where offset measurement along this edge starts.
    pub fn origin(&self) -> Corner {
        // The corner completed by the face opposite the direction:
        // cross(rhs, lhs) is the cross face's opposite.
        let third = self
            .rhs
            .cross(self.lhs)
            .expect("adjacent faces always have a cross face");
        Corner::of(self.lhs, self.rhs, third)
    }

    /// Length of this edge on a given box.
    pub fn length_in(&self, dims: &BoxDims) -> f64 {
        dims.extent(self.cross_face().axis())
    }

    /// The point at `offset` mm from the origin corner along the edge
    /// direction.
    ///
    /// Offsets outside `[0, length]` extrapolate linearly; whether that is
    /// permitted is decided where anchors are bound, not here.
    pub fn point_in(&self, dims: &BoxDims, offset: f64) -> Point3 {
        let origin = self.origin().point_in(dims);
        origin + self.direction() * offset
    }
}

/// One of the eight corners of the box, named by three mutually adjacent
/// faces (one per axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Corner {
    length_face: Face,
    width_face: Face,
    height_face: Face,
}

impl Corner {
    /// Assemble a corner from three faces covering all three axes.
    ///
    /// Callers pass faces known to be mutually adjacent (an edge pair plus
    /// its cross face), so axis coverage always holds.
    pub(crate) fn of(a: Face, b: Face, c: Face) -> Corner {
        let mut length_face = None;
        let mut width_face = None;
        let mut height_face = None;
        for face in [a, b, c] {
            match face.axis() {
                super::Axis::Length => length_face = Some(face),
                super::Axis::Width => width_face = Some(face),
                super::Axis::Height => height_face = Some(face),
            }
        }
        debug_assert!(length_face.is_some() && width_face.is_some() && height_face.is_some());
        Corner {
            length_face: length_face.expect("corner faces cover the length axis"),
            width_face: width_face.expect("corner faces cover the width axis"),
            height_face: height_face.expect("corner faces cover the height axis"),
        }
    }

    /// The corner's position on a given box.
    pub fn point_in(&self, dims: &BoxDims) -> Point3 {
        let x = if self.length_face == Face::Top {
            dims.length
        } else {
            0.0
        };
        let y = if self.width_face == Face::Right {
            dims.width
        } else {
            0.0
        };
        let z = if self.height_face == Face::Front {
            dims.height
        } else {
            0.0
        };
        Point3::new(x, y, z)
    }
}
