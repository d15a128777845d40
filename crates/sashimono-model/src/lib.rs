#![warn(missing_docs)]

//! Piece, anchor, and connection model for sashimono assemblies.
//!
//! This crate holds the declarative half of the system: immutable lumber
//! [`Piece`]s, [`Anchor`]s naming a point on a piece's surface, and
//! [`Connection`]s declaring that two anchored points coincide face to
//! face. Declarations are pure data — geometric feasibility is judged
//! later, during graph resolution and validation, because a connection's
//! validity can depend on the other connections already fixing a piece's
//! pose.

mod anchor;
mod joint;
mod piece;

pub use anchor::{Anchor, BoundAnchor};
pub use joint::{dowel_preset, DowelSpec, JointKind, DOWEL_PRESETS};
pub use piece::{LumberKind, Piece};

use serde::{Deserialize, Serialize};
use sashimono_geom::GeomError;
use thiserror::Error;

/// Errors raised while constructing model declarations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Piece length must be positive and finite.
    #[error("invalid length {length} mm for piece '{name}': must be positive")]
    InvalidDimension {
        /// Name of the offending piece.
        name: String,
        /// The rejected length.
        length: f64,
    },

    /// The two anchor faces do not form an edge.
    #[error(transparent)]
    InvalidEdge(#[from] GeomError),

    /// A bound anchor's offset falls outside its edge.
    #[error(
        "offset {offset_mm} mm is outside [0, {edge_length_mm}] on piece '{piece}' \
         (use an overhanging bind if the piece extends past the anchor)"
    )]
    OffsetOutOfRange {
        /// Name of the piece the anchor is bound to.
        piece: String,
        /// The normalized (from-min) offset.
        offset_mm: f64,
        /// Length of the anchor's edge on this piece.
        edge_length_mm: f64,
    },

    /// No lumber kind matches the given name.
    #[error("unknown lumber kind '{0}'")]
    UnknownLumberKind(String),
}

/// A declared face-to-face connection between two pieces.
///
/// The pair is unordered in meaning: resolving with lhs and rhs swapped
/// yields the same assembly. Construction performs no geometric
/// feasibility checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// One side of the connection.
    pub lhs: BoundAnchor,
    /// The other side.
    pub rhs: BoundAnchor,
    /// Fastening metadata; never affects pose resolution.
    pub joint: JointKind,
    /// Optional build-order hint consumed by assembly-order validation.
    pub build_order: Option<u32>,
}

impl Connection {
    /// Declare that two bound anchor points coincide, with a plain butt
    /// joint and no build-order hint.
    pub fn of(lhs: BoundAnchor, rhs: BoundAnchor) -> Self {
        Self {
            lhs,
            rhs,
            joint: JointKind::default(),
            build_order: None,
        }
    }

    /// Replace the joint metadata.
    pub fn with_joint(mut self, joint: JointKind) -> Self {
        self.joint = joint;
        self
    }

    /// Attach a build-order hint.
    pub fn with_build_order(mut self, order: u32) -> Self {
        self.build_order = Some(order);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sashimono_geom::{Face, Offset};

    fn stud(name: &str, length: f64) -> Piece {
        Piece::create(LumberKind::TwoByFour, length, name).unwrap()
    }

    #[test]
    fn test_piece_create_rejects_bad_lengths() {
        assert!(Piece::create(LumberKind::TwoByFour, 0.0, "p").is_err());
        assert!(Piece::create(LumberKind::TwoByFour, -10.0, "p").is_err());
        assert!(Piece::create(LumberKind::TwoByFour, f64::NAN, "p").is_err());
        assert!(Piece::create(LumberKind::TwoByFour, 1.0, "p").is_ok());
    }

    #[test]
    fn test_lumber_sections() {
        let s = LumberKind::TwoByFour.section();
        assert_eq!((s.width, s.height), (89.0, 38.0));
        let s = LumberKind::OneByFour.section();
        assert_eq!((s.width, s.height), (89.0, 19.0));
        assert_eq!(LumberKind::of("2x4").unwrap(), LumberKind::TwoByFour);
        assert!(LumberKind::of("2x6").is_err());
    }

    #[test]
    fn test_anchor_rejects_non_adjacent_faces() {
        assert!(Anchor::new(Face::Top, Face::Top, Offset::FromMin(0.0)).is_err());
        assert!(Anchor::new(Face::Top, Face::Down, Offset::FromMin(0.0)).is_err());
        assert!(Anchor::new(Face::Top, Face::Front, Offset::FromMin(0.0)).is_ok());
    }

    #[test]
    fn test_bind_range_checks_canonical_offset() {
        let p = stud("a", 800.0);
        // down∧front runs across the width (89 mm).
        let narrow = Anchor::new(Face::Down, Face::Front, Offset::FromMin(44.5)).unwrap();
        assert!(BoundAnchor::bind(&p, narrow).is_ok());

        let wide = Anchor::new(Face::Down, Face::Front, Offset::FromMin(120.0)).unwrap();
        let err = BoundAnchor::bind(&p, wide).unwrap_err();
        assert!(matches!(err, ModelError::OffsetOutOfRange { .. }));

        // FromMax normalizes before the check: 89 - 100 < 0.
        let neg = Anchor::new(Face::Down, Face::Front, Offset::FromMax(100.0)).unwrap();
        assert!(BoundAnchor::bind(&p, neg).is_err());

        // Overhanging bind admits the same anchors.
        let wide = Anchor::new(Face::Down, Face::Front, Offset::FromMin(120.0)).unwrap();
        let bound = BoundAnchor::bind_overhanging(&p, wide).unwrap();
        assert!((bound.offset_mm() - 120.0).abs() < 1e-12);
    }

    #[test]
    fn test_bind_rejects_nan_offset() {
        let p = stud("a", 800.0);
        let nan = Anchor::new(Face::Down, Face::Front, Offset::FromMin(f64::NAN)).unwrap();
        let err = BoundAnchor::bind(&p, nan).unwrap_err();
        assert!(matches!(err, ModelError::OffsetOutOfRange { .. }));

        let nan = Anchor::new(Face::Down, Face::Front, Offset::FromMax(f64::NAN)).unwrap();
        assert!(BoundAnchor::bind(&p, nan).is_err());
    }

    #[test]
    fn test_bound_anchor_local_point() {
        // Mid-width point on the rail's down-front edge.
        let b = stud("b", 400.0);
        let anchor = Anchor::new(Face::Down, Face::Front, Offset::FromMin(44.5)).unwrap();
        let bound = BoundAnchor::bind(&b, anchor).unwrap();
        let p = bound.local_point();
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 44.5).abs() < 1e-12);
        assert!((p.z - 38.0).abs() < 1e-12);
        let n = bound.contact_normal();
        assert!((n.x + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_joint_frame_is_rigid_and_flips_cleanly() {
        let p = stud("a", 600.0);
        let anchor = Anchor::new(Face::Left, Face::Back, Offset::FromMax(0.0)).unwrap();
        let bound = BoundAnchor::bind(&p, anchor).unwrap();

        let plain = bound.joint_frame(false);
        let flipped = bound.joint_frame(true);

        // Both frames share the anchor origin.
        let o1 = plain.translation_part();
        let o2 = flipped.translation_part();
        assert!((o1 - o2).norm() < 1e-12);

        // The flipped frame negates the contact direction (third column).
        let r1 = plain.rotation_part();
        let r2 = flipped.rotation_part();
        for i in 0..3 {
            assert!((r1[(i, 2)] + r2[(i, 2)]).abs() < 1e-12);
        }

        // Rotation blocks are orthonormal.
        for r in [r1, r2] {
            let should_be_identity = r.transpose() * r;
            for i in 0..3 {
                for j in 0..3 {
                    let expect = if i == j { 1.0 } else { 0.0 };
                    assert!((should_be_identity[(i, j)] - expect).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_dowel_presets() {
        assert!(dowel_preset(8.0, 30.0).is_some());
        assert!(dowel_preset(9.0, 99.0).is_none());
        let joint = JointKind::from_dowel(dowel_preset(8.0, 30.0).unwrap());
        match joint {
            JointKind::Dowel {
                radius_mm,
                depth_mm,
            } => {
                assert!((radius_mm - 4.0).abs() < 1e-12);
                assert!((depth_mm - 15.0).abs() < 1e-12);
            }
            _ => panic!("expected a dowel joint"),
        }
    }

    #[test]
    fn test_connection_builders() {
        let a = stud("a", 800.0);
        let b = stud("b", 400.0);
        let la = BoundAnchor::bind(
            &a,
            Anchor::new(Face::Front, Face::Right, Offset::FromMin(400.0)).unwrap(),
        )
        .unwrap();
        let rb = BoundAnchor::bind(
            &b,
            Anchor::new(Face::Down, Face::Front, Offset::FromMin(44.5)).unwrap(),
        )
        .unwrap();
        let conn = Connection::of(la, rb)
            .with_joint(JointKind::Dowel {
                radius_mm: 4.0,
                depth_mm: 15.0,
            })
            .with_build_order(3);
        assert_eq!(conn.build_order, Some(3));
        assert!(matches!(conn.joint, JointKind::Dowel { .. }));
    }
}
