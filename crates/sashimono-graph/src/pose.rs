//! Breadth-first pose resolution.

use std::collections::VecDeque;

use log::debug;
use sashimono_math::{Tolerance, Transform};

use crate::validate::{CheckName, Finding, Severity};
use crate::{AssemblyGraph, ConnIx, PieceIx};

/// World poses assigned by [`resolve_poses`].
///
/// Pieces unreachable from the root stay `None`; the connectivity check
/// reports them.
#[derive(Debug, Clone)]
pub struct PoseSet {
    poses: Vec<Option<Transform>>,
    root: Option<PieceIx>,
}

impl PoseSet {
    /// Pose of a piece, if it was reached.
    pub fn pose(&self, ix: PieceIx) -> Option<&Transform> {
        self.poses[ix.0].as_ref()
    }

    /// True when the piece was reached from the root.
    pub fn is_resolved(&self, ix: PieceIx) -> bool {
        self.poses[ix.0].is_some()
    }

    /// The piece placed at the identity pose.
    pub fn root(&self) -> Option<PieceIx> {
        self.root
    }

    /// Number of resolved pieces.
    pub fn resolved_count(&self) -> usize {
        self.poses.iter().filter(|p| p.is_some()).count()
    }
}

/// Walk the graph breadth-first from `root` (default: first piece in
/// name order) and assign every reachable piece a world pose.
///
/// The root gets the identity pose. Each connection fixes its far piece
/// relative to the near one by mating the two joint frames, far side
/// flipped. A connection that closes a cycle is instead checked: the
/// pose it implies must agree with the pose already assigned, and any
/// residual beyond tolerance becomes a finding. Resolution never fails
/// and never reassigns a pose.
pub fn resolve_poses(graph: &AssemblyGraph, root: Option<PieceIx>) -> (PoseSet, Vec<Finding>) {
    let mut poses: Vec<Option<Transform>> = vec![None; graph.len()];
    let mut findings = Vec::new();
    let tol = Tolerance::DEFAULT;

    let root = root.or_else(|| graph.root());
    let Some(root) = root else {
        return (PoseSet { poses, root: None }, findings);
    };

    debug!("resolving poses from root '{}'", graph.piece(root).name);
    poses[root.0] = Some(Transform::identity());

    let mut used = vec![false; graph.connections().len()];
    let mut queue = VecDeque::from([root]);
    while let Some(here) = queue.pop_front() {
        for &(next, conn) in graph.neighbors(here) {
            if used[conn.0] {
                continue;
            }
            used[conn.0] = true;
            let here_pose = poses[here.0]
                .clone()
                .expect("queued pieces always hold a pose");
            let implied = implied_pose(graph, conn, here, &here_pose);
            match &poses[next.0] {
                None => {
                    debug!(
                        "placing '{}' via '{}'",
                        graph.piece(next).name,
                        graph.piece(here).name
                    );
                    poses[next.0] = Some(implied);
                    queue.push_back(next);
                }
                Some(existing) => {
                    let delta = existing.rigid_delta(&implied);
                    if !tol.is_zero(delta.translation) || delta.rotation > tol.angular {
                        findings.push(Finding {
                            severity: Severity::Error,
                            check: CheckName::Resolution,
                            message: format!(
                                "cycle through '{}' and '{}' does not close: poses disagree by \
                                 {:.3} mm and {:.6} rad",
                                graph.piece(here).name,
                                graph.piece(next).name,
                                delta.translation,
                                delta.rotation,
                            ),
                            pieces: vec![
                                graph.piece(here).name.clone(),
                                graph.piece(next).name.clone(),
                            ],
                            suggestion: Some(
                                "check the lengths and offsets of the pieces around this loop"
                                    .to_string(),
                            ),
                        });
                    }
                }
            }
        }
    }

    (
        PoseSet {
            poses,
            root: Some(root),
        },
        findings,
    )
}

/// Pose the far end of `conn` would take, given the near end's pose.
fn implied_pose(
    graph: &AssemblyGraph,
    conn: ConnIx,
    near: PieceIx,
    near_pose: &Transform,
) -> Transform {
    let connection = graph.connection(conn);
    let (a, _) = graph.ends(conn);
    let (near_anchor, far_anchor) = if a == near {
        (&connection.lhs, &connection.rhs)
    } else {
        (&connection.rhs, &connection.lhs)
    };
    near_pose
        .then(&near_anchor.joint_frame(false))
        .then(&far_anchor.joint_frame(true).rigid_inverse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sashimono_geom::{Face, Offset};
    use sashimono_model::{Anchor, BoundAnchor, Connection, LumberKind, Piece};

    fn stud(name: &str, length: f64) -> Piece {
        Piece::create(LumberKind::TwoByFour, length, name).unwrap()
    }

    #[test]
    fn test_root_gets_identity_and_neighbors_mate() {
        let a = stud("a", 800.0);
        let b = stud("b", 400.0);
        let on_a = BoundAnchor::bind(
            &a,
            Anchor::new(Face::Front, Face::Right, Offset::FromMin(400.0)).unwrap(),
        )
        .unwrap();
        let on_b = BoundAnchor::bind(
            &b,
            Anchor::new(Face::Down, Face::Front, Offset::FromMin(44.5)).unwrap(),
        )
        .unwrap();
        let graph =
            AssemblyGraph::build(vec![a, b], vec![Connection::of(on_a.clone(), on_b.clone())])
                .unwrap();
        let (poses, findings) = resolve_poses(&graph, None);
        assert!(findings.is_empty());
        assert_eq!(poses.root(), graph.index_of("a"));
        assert_eq!(poses.resolved_count(), 2);

        let pose_a = poses.pose(graph.index_of("a").unwrap()).unwrap();
        let pose_b = poses.pose(graph.index_of("b").unwrap()).unwrap();
        assert_eq!(*pose_a, Transform::identity());

        // The two anchor points land on the same world point and the
        // contact faces press together.
        let pa = pose_a.apply_point(&on_a.local_point());
        let pb = pose_b.apply_point(&on_b.local_point());
        assert!((pa - pb).norm() < 1e-6);
        let na = pose_a.apply_vec(&on_a.contact_normal());
        let nb = pose_b.apply_vec(&on_b.contact_normal());
        assert!((na.dot(&nb) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unreachable_pieces_stay_unresolved() {
        let a = stud("a", 800.0);
        let loose = stud("loose", 300.0);
        let graph = AssemblyGraph::build(vec![a, loose], vec![]).unwrap();
        let (poses, findings) = resolve_poses(&graph, None);
        assert!(findings.is_empty());
        assert!(poses.is_resolved(graph.index_of("a").unwrap()));
        assert!(!poses.is_resolved(graph.index_of("loose").unwrap()));
    }

    #[test]
    fn test_caller_chosen_root() {
        let a = stud("a", 800.0);
        let b = stud("b", 400.0);
        let graph = AssemblyGraph::build(vec![a, b], vec![]).unwrap();
        let root = graph.index_of("b");
        let (poses, _) = resolve_poses(&graph, root);
        assert_eq!(poses.root(), root);
        assert!(poses.is_resolved(root.unwrap()));
    }
}
