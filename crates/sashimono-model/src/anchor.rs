use serde::{Deserialize, Serialize};
use sashimono_geom::{Edge, Face, Offset};
use sashimono_math::{Point3, Transform, Vec3};

use crate::{ModelError, Piece};

/// A point on a piece's surface, named without reference to dimensions.
///
/// The point lives on the edge where `contact` meets `edge_shared`,
/// displaced `offset` along the edge. `contact` is the face that mates
/// with the other piece. Construction only checks that the two faces
/// actually share an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// The mating face.
    pub contact: Face,
    /// The adjacent face whose edge with `contact` carries the offset.
    pub edge_shared: Face,
    /// Displacement along the edge.
    pub offset: Offset,
}

impl Anchor {
    /// Create an anchor, rejecting face pairs that do not form an edge.
    pub fn new(contact: Face, edge_shared: Face, offset: Offset) -> Result<Self, ModelError> {
        // Orientation is recomputed on demand; here the edge only
        // witnesses adjacency.
        Edge::new(contact, edge_shared)?;
        Ok(Self {
            contact,
            edge_shared,
            offset,
        })
    }
}

/// An [`Anchor`] bound to a concrete [`Piece`].
///
/// Binding resolves the offset to a from-min scalar against the piece's
/// actual edge length, so two declarations that name the same physical
/// point compare equal afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundAnchor {
    piece: Piece,
    anchor: Anchor,
    offset_mm: f64,
}

impl BoundAnchor {
    /// Bind an anchor to a piece, requiring the offset to land on the
    /// edge itself.
    pub fn bind(piece: &Piece, anchor: Anchor) -> Result<Self, ModelError> {
        let bound = Self::bind_overhanging(piece, anchor)?;
        let edge_length = bound.edge().length_in(&bound.piece.dims());
        // Negated containment so a NaN offset is rejected too.
        if !(0.0..=edge_length).contains(&bound.offset_mm) {
            return Err(ModelError::OffsetOutOfRange {
                piece: bound.piece.name.clone(),
                offset_mm: bound.offset_mm,
                edge_length_mm: edge_length,
            });
        }
        Ok(bound)
    }

    /// Bind an anchor whose point may lie past the ends of its edge.
    ///
    /// The joint point is extrapolated linearly along the edge
    /// direction. Used when a mating piece overhangs, e.g. a rail
    /// joining a leg below the leg's top end.
    pub fn bind_overhanging(piece: &Piece, anchor: Anchor) -> Result<Self, ModelError> {
        let edge = Edge::oriented(anchor.contact, anchor.edge_shared)?;
        let edge_length = edge.length_in(&piece.dims());
        let offset_mm = anchor.offset.resolve(edge_length);
        Ok(Self {
            piece: piece.clone(),
            anchor,
            offset_mm,
        })
    }

    /// The piece this anchor is bound to.
    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    /// The underlying anchor declaration.
    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    /// Canonical from-min offset along the oriented edge, in millimetres.
    pub fn offset_mm(&self) -> f64 {
        self.offset_mm
    }

    /// The oriented edge the anchor point lies on.
    pub fn edge(&self) -> Edge {
        // Adjacency was proven at construction.
        Edge::oriented(self.anchor.contact, self.anchor.edge_shared)
            .expect("anchor faces form an edge")
    }

    /// Anchor point in the piece's local frame.
    pub fn local_point(&self) -> Point3 {
        self.edge().point_in(&self.piece.dims(), self.offset_mm)
    }

    /// Outward normal of the contact face, in the piece's local frame.
    pub fn contact_normal(&self) -> Vec3 {
        self.anchor.contact.normal()
    }

    /// Rigid frame of the joint at this anchor, in the piece's local
    /// coordinates.
    ///
    /// The frame's Z axis points against the contact normal (into the
    /// piece), its Y axis along the edge's cross face, and its X axis
    /// completes a right-handed basis. `flip` turns the frame half a
    /// revolution about its Y axis; mating frames are built with one
    /// side flipped so the two contact faces press together.
    pub fn joint_frame(&self, flip: bool) -> Transform {
        let mut dir = self.anchor.contact.normal();
        // Ordered cross, not the oriented edge's: swapping contact and
        // edge-shared must turn the frame, or mating sides would not
        // distinguish the two faces meeting at the same edge.
        let up = self
            .anchor
            .contact
            .cross(self.anchor.edge_shared)
            .expect("anchor faces form an edge")
            .normal();
        if flip {
            dir = -dir;
        }
        let right = dir.cross(&up);
        let up = right.cross(&dir);
        Transform::from_frame(&self.local_point(), &right, &up, &-dir)
    }
}
