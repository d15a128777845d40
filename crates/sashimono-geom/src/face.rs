//! The six canonical faces of a lumber piece and their axis algebra.

use sashimono_math::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three local box axes of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// X: the length axis (down → top).
    Length,
    /// Y: the width axis (left → right).
    Width,
    /// Z: the height axis (back → front).
    Height,
}

/// One of the six faces of a piece's local bounding box.
///
/// Faces are named from the perspective of a piece standing on end:
/// `Top`/`Down` cap the length axis, `Left`/`Right` bound the width,
/// `Front`/`Back` bound the height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    /// +X end of the length axis.
    Top,
    /// -X end of the length axis.
    Down,
    /// -Y side of the width axis.
    Left,
    /// +Y side of the width axis.
    Right,
    /// +Z side of the height axis.
    Front,
    /// -Z side of the height axis.
    Back,
}

impl Face {
    /// All six faces.
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::Down,
        Face::Left,
        Face::Right,
        Face::Front,
        Face::Back,
    ];

    /// The face on the opposite side of the box.
    pub fn opposite(self) -> Face {
        match self {
            Face::Top => Face::Down,
            Face::Down => Face::Top,
            Face::Left => Face::Right,
            Face::Right => Face::Left,
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        }
    }

    /// The local box axis this face caps.
    pub fn axis(self) -> Axis {
        match self {
            Face::Top | Face::Down => Axis::Length,
            Face::Left | Face::Right => Axis::Width,
            Face::Front | Face::Back => Axis::Height,
        }
    }

    /// Whether this face points along the positive direction of its axis.
    pub fn is_positive(self) -> bool {
        matches!(self, Face::Top | Face::Right | Face::Front)
    }

    /// Outward unit normal in the piece's local frame.
    pub fn normal(self) -> Vec3 {
        match self {
            Face::Top => Vec3::new(1.0, 0.0, 0.0),
            Face::Down => Vec3::new(-1.0, 0.0, 0.0),
            Face::Left => Vec3::new(0.0, -1.0, 0.0),
            Face::Right => Vec3::new(0.0, 1.0, 0.0),
            Face::Front => Vec3::new(0.0, 0.0, 1.0),
            Face::Back => Vec3::new(0.0, 0.0, -1.0),
        }
    }

    /// The face whose normal is the given exact unit axis vector, if any.
    pub fn from_normal(v: &Vec3) -> Option<Face> {
        Face::ALL.iter().copied().find(|f| {
            let n = f.normal();
            (n - v).norm() < 1e-9
        })
    }

    /// Face "cross product": the face whose normal is the cross product of
    /// the two outward normals.
    ///
    /// Returns `None` when the faces share an axis (parallel normals).
    pub fn cross(self, other: Face) -> Option<Face> {
        Face::from_normal(&self.normal().cross(&other.normal()))
    }

    /// Whether two faces meet at an edge (distinct and not opposite).
    pub fn is_adjacent(self, other: Face) -> bool {
        self != other && self.axis() != other.axis()
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Face::Top => "top",
            Face::Down => "down",
            Face::Left => "left",
            Face::Right => "right",
            Face::Front => "front",
            Face::Back => "back",
        };
        f.write_str(s)
    }
}
