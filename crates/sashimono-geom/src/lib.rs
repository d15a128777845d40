#![warn(missing_docs)]

//! Face/edge/offset addressing on lumber bounding boxes.
//!
//! A lumber piece is an axis-aligned box in its local frame:
//! X = length axis (down → top), Y = width axis (left → right),
//! Z = height axis (back → front), occupying
//! `[0, length] x [0, width] x [0, height]`.
//!
//! This crate names locations on that box: the six [`Face`]s, the twelve
//! [`Edge`]s formed by adjacent face pairs, the eight [`Corner`]s, and
//! scalar [`Offset`]s measured along an edge. Everything here is pure
//! data and pure functions; the only failure mode is asking for an edge
//! that does not exist.

mod dims;
mod edge;
mod face;
mod offset;

pub use dims::{BoxDims, Section};
pub use edge::{Corner, Edge};
pub use face::{Axis, Face};
pub use offset::Offset;

use thiserror::Error;

/// Errors from geometric addressing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeomError {
    /// Two faces that are identical or mutually opposite form no edge.
    #[error("faces {lhs} and {rhs} do not form an edge")]
    InvalidEdge {
        /// First face.
        lhs: Face,
        /// Second face.
        rhs: Face,
    },
}
