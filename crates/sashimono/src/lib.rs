#![warn(missing_docs)]

//! Assembly graph resolution for dimensioned-lumber furniture.
//!
//! Declare [`Piece`]s of lumber and face-to-face [`Connection`]s between
//! them, and [`resolve`] turns the declarations into world poses plus a
//! validation report:
//!
//! ```
//! use sashimono::{
//!     resolve, Anchor, AssemblyGraph, BoundAnchor, Connection, Face, LumberKind, Offset, Piece,
//!     ValidationMode,
//! };
//!
//! let post = Piece::create(LumberKind::TwoByFour, 800.0, "post")?;
//! let rail = Piece::create(LumberKind::TwoByFour, 400.0, "rail")?;
//! let on_post = BoundAnchor::bind(
//!     &post,
//!     Anchor::new(Face::Front, Face::Right, Offset::FromMin(400.0))?,
//! )?;
//! let on_rail = BoundAnchor::bind(
//!     &rail,
//!     Anchor::new(Face::Down, Face::Front, Offset::FromMin(44.5))?,
//! )?;
//!
//! let graph = AssemblyGraph::build(
//!     vec![post, rail],
//!     vec![Connection::of(on_post, on_rail)],
//! )?;
//! let assembly = resolve(&graph, ValidationMode::Permissive)?;
//! assert!(assembly.pose_of("rail").is_some());
//! # Ok::<(), sashimono::Error>(())
//! ```
//!
//! The heavy lifting lives in the focused subcrates, re-exported here:
//! [`sashimono_math`] for rigid transforms, [`sashimono_geom`] for the
//! face/edge algebra of the lumber box, [`sashimono_model`] for pieces
//! and anchors, and [`sashimono_graph`] for traversal, pose resolution,
//! and validation.

use std::collections::BTreeMap;

use log::info;
use serde::Serialize;
use thiserror::Error;

pub use sashimono_geom::{Axis, BoxDims, Corner, Edge, Face, GeomError, Offset, Section};
pub use sashimono_graph::{
    resolve_poses, AssemblyGraph, Check, CheckName, ConnIx, Finding, GraphError, PieceIx, PoseSet,
    Severity, ValidationMode, ValidationReport, ValidationSuite,
};
pub use sashimono_math::{Point3, RigidDelta, Tolerance, Transform, Vec3};
pub use sashimono_model::{
    dowel_preset, Anchor, BoundAnchor, Connection, DowelSpec, JointKind, LumberKind, ModelError,
    Piece, DOWEL_PRESETS,
};

/// Top-level error for the facade operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid piece or anchor declarations.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The declarations do not form a well-formed graph.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// No piece carries the requested root name.
    #[error("unknown root piece '{0}'")]
    UnknownRoot(String),

    /// Strict validation rejected the assembly. The resolved poses and
    /// the full report ride along so nothing is lost.
    #[error("assembly failed strict validation with {} finding(s)", .0.report.findings.len())]
    Validation(Box<ResolvedAssembly>),
}

/// A pose flattened for serialization: translation plus rotation rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseRecord {
    /// World position of the piece's local origin, in millimetres.
    pub translation: [f64; 3],
    /// Rotation matrix, row major.
    pub rotation: [[f64; 3]; 3],
}

impl PoseRecord {
    fn of(pose: &Transform) -> Self {
        let t = pose.translation_part();
        let r = pose.rotation_part();
        Self {
            translation: [t.x, t.y, t.z],
            rotation: [
                [r[(0, 0)], r[(0, 1)], r[(0, 2)]],
                [r[(1, 0)], r[(1, 1)], r[(1, 2)]],
                [r[(2, 0)], r[(2, 1)], r[(2, 2)]],
            ],
        }
    }

    /// Apply this pose to a local point.
    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let mut out = self.translation;
        for (i, row) in self.rotation.iter().enumerate() {
            out[i] += row[0] * p[0] + row[1] * p[1] + row[2] * p[2];
        }
        out
    }
}

/// The outcome of resolving an assembly: a pose per piece (where one
/// exists) and the validation report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAssembly {
    /// Piece name to world pose. `None` for pieces the root cannot reach.
    pub poses: BTreeMap<String, Option<PoseRecord>>,
    /// Everything resolution and validation found.
    pub report: ValidationReport,
}

impl ResolvedAssembly {
    /// Pose of a piece by name, if it resolved.
    pub fn pose_of(&self, name: &str) -> Option<&PoseRecord> {
        self.poses.get(name).and_then(|p| p.as_ref())
    }

    /// Serialize the whole result as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Resolve an assembly from its first piece in name order.
pub fn resolve(graph: &AssemblyGraph, mode: ValidationMode) -> Result<ResolvedAssembly, Error> {
    resolve_inner(graph, None, mode)
}

/// Resolve an assembly with a chosen piece pinned at the identity pose.
pub fn resolve_from(
    graph: &AssemblyGraph,
    root: &str,
    mode: ValidationMode,
) -> Result<ResolvedAssembly, Error> {
    let root_ix = graph
        .index_of(root)
        .ok_or_else(|| Error::UnknownRoot(root.to_string()))?;
    resolve_inner(graph, Some(root_ix), mode)
}

fn resolve_inner(
    graph: &AssemblyGraph,
    root: Option<PieceIx>,
    mode: ValidationMode,
) -> Result<ResolvedAssembly, Error> {
    let (poses, mut findings) = resolve_poses(graph, root);
    let report = ValidationSuite::default().run(graph, &poses, mode);
    findings.extend(report.findings);
    let report = ValidationReport { mode, findings };
    info!(
        "resolved {} of {} piece(s): {} error(s), {} warning(s)",
        poses.resolved_count(),
        graph.len(),
        report.error_count(),
        report.warning_count(),
    );

    let mut records = BTreeMap::new();
    for &ix in graph.order() {
        let record = poses.pose(ix).map(PoseRecord::of);
        records.insert(graph.piece(ix).name.clone(), record);
    }
    let assembly = ResolvedAssembly {
        poses: records,
        report,
    };

    if mode == ValidationMode::Strict && !assembly.report.findings.is_empty() {
        return Err(Error::Validation(Box::new(assembly)));
    }
    Ok(assembly)
}
