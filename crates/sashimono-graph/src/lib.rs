#![warn(missing_docs)]

//! Assembly graph, pose resolution, and validation.
//!
//! Pieces are nodes, declared connections are edges. [`AssemblyGraph`]
//! indexes the declarations for traversal; [`resolve_poses`] walks the
//! graph breadth-first from a root piece and assigns every reachable
//! piece a rigid world pose; the [`validate`] module inspects the result
//! for the mistakes that matter at a workbench.
//!
//! Resolution itself never fails. Cycles whose closure disagrees,
//! unreachable pieces, and colliding boxes are all reported as
//! [`Finding`]s so a caller always gets the full picture at once.

mod error;
mod graph;
mod pose;
pub mod validate;

pub use error::GraphError;
pub use graph::{AssemblyGraph, ConnIx, PieceIx};
pub use pose::{resolve_poses, PoseSet};
pub use validate::{
    Check, CheckName, Finding, Severity, ValidationMode, ValidationReport, ValidationSuite,
};
