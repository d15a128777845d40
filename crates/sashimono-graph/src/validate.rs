//! Assembly validation checks.
//!
//! Checks inspect a resolved assembly and report [`Finding`]s instead of
//! failing, so one run surfaces every problem at once. Severity of some
//! findings depends on the [`ValidationMode`]: a workshop double-checking
//! a cut list runs `Strict`, a sketch session runs `Permissive`.

use std::collections::BTreeSet;
use std::fmt;

use log::debug;
use sashimono_math::{Point3, Tolerance};
use serde::{Deserialize, Serialize};

use crate::{AssemblyGraph, ConnIx, PieceIx, PoseSet};

// ============================================================================
// Findings
// ============================================================================

/// How serious a finding is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth knowing, nothing wrong.
    Info,
    /// Likely a mistake; the assembly still resolves.
    Warning,
    /// The assembly as declared cannot be built correctly.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Which check produced a finding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    /// Cycle closure during pose resolution.
    Resolution,
    /// Pieces unreachable from the main body of the assembly.
    Connectivity,
    /// Overlapping bounding boxes.
    Collision,
    /// Mating anchors that do not meet.
    Joint,
    /// Pieces fastened too weakly to hold.
    Structural,
    /// Build-order hints that cannot be followed.
    AssemblyOrder,
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckName::Resolution => write!(f, "resolution"),
            CheckName::Connectivity => write!(f, "connectivity"),
            CheckName::Collision => write!(f, "collision"),
            CheckName::Joint => write!(f, "joint"),
            CheckName::Structural => write!(f, "structural"),
            CheckName::AssemblyOrder => write!(f, "assembly-order"),
        }
    }
}

/// One diagnostic from one check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// How serious it is.
    pub severity: Severity,
    /// The check that produced it.
    pub check: CheckName,
    /// Human-readable description.
    pub message: String,
    /// Names of the pieces involved.
    pub pieces: Vec<String>,
    /// What to do about it, when the check can tell.
    pub suggestion: Option<String>,
}

// ============================================================================
// Checks
// ============================================================================

/// How strictly findings are judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Any finding fails the assembly and borderline findings escalate.
    Strict,
    /// Only errors fail; borderline findings stay warnings.
    Permissive,
}

impl Default for ValidationMode {
    fn default() -> Self {
        ValidationMode::Permissive
    }
}

/// A single configurable check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Check {
    /// Every non-standalone piece must connect to the main body.
    Connectivity,
    /// No two boxes may interpenetrate.
    Collision {
        /// Penetration depth below this is treated as surface contact.
        tolerance_mm: f64,
    },
    /// Mating anchor points must coincide and contact faces must oppose.
    Joint {
        /// Gap below this counts as met.
        tolerance_mm: f64,
    },
    /// Each piece needs enough fasteners to stay put.
    Structural {
        /// Connections per non-standalone piece.
        min_connections: usize,
    },
    /// Build-order hints must describe a feasible sequence.
    AssemblyOrder,
}

impl Check {
    /// Run this check over a resolved assembly.
    pub fn run(&self, graph: &AssemblyGraph, poses: &PoseSet, mode: ValidationMode) -> Vec<Finding> {
        match *self {
            Check::Connectivity => check_connectivity(graph, mode),
            Check::Collision { tolerance_mm } => check_collision(graph, poses, mode, tolerance_mm),
            Check::Joint { tolerance_mm } => check_joint(graph, poses, tolerance_mm),
            Check::Structural { min_connections } => {
                check_structural(graph, mode, min_connections)
            }
            Check::AssemblyOrder => check_assembly_order(graph),
        }
    }

    /// The name this check reports under.
    pub fn name(&self) -> CheckName {
        match self {
            Check::Connectivity => CheckName::Connectivity,
            Check::Collision { .. } => CheckName::Collision,
            Check::Joint { .. } => CheckName::Joint,
            Check::Structural { .. } => CheckName::Structural,
            Check::AssemblyOrder => CheckName::AssemblyOrder,
        }
    }
}

/// The standard battery of checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSuite {
    /// Checks to run, in order.
    pub checks: Vec<Check>,
}

impl Default for ValidationSuite {
    fn default() -> Self {
        Self {
            checks: vec![
                Check::Connectivity,
                Check::Collision { tolerance_mm: 1.0 },
                Check::Joint {
                    tolerance_mm: Tolerance::DEFAULT.coincidence,
                },
                Check::Structural { min_connections: 2 },
                Check::AssemblyOrder,
            ],
        }
    }
}

impl ValidationSuite {
    /// Run every check and collect the findings into a report.
    pub fn run(
        &self,
        graph: &AssemblyGraph,
        poses: &PoseSet,
        mode: ValidationMode,
    ) -> ValidationReport {
        let mut findings = Vec::new();
        for check in &self.checks {
            let found = check.run(graph, poses, mode);
            debug!("{} check: {} finding(s)", check.name(), found.len());
            findings.extend(found);
        }
        ValidationReport { mode, findings }
    }
}

// ============================================================================
// Report
// ============================================================================

/// The outcome of a validation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Mode the assembly was judged under.
    pub mode: ValidationMode,
    /// Everything the checks found, in check order.
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// Whether the assembly passes under its mode: strict tolerates no
    /// findings at all, permissive tolerates anything short of an error.
    pub fn passed(&self) -> bool {
        match self.mode {
            ValidationMode::Strict => self.findings.is_empty(),
            ValidationMode::Permissive => self.error_count() == 0,
        }
    }

    /// Number of error findings.
    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    /// Number of warning findings.
    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    /// All piece names any finding touches, deduplicated and sorted.
    pub fn affected_pieces(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self.findings.iter().flat_map(|f| &f.pieces).collect();
        set.into_iter().cloned().collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} error(s), {} warning(s)",
            if self.passed() { "PASS" } else { "FAIL" },
            self.error_count(),
            self.warning_count(),
        )?;
        for finding in &self.findings {
            writeln!(f, "[{}] {}: {}", finding.severity, finding.check, finding.message)?;
            if let Some(suggestion) = &finding.suggestion {
                writeln!(f, "    suggestion: {}", suggestion)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Check implementations
// ============================================================================

fn check_connectivity(graph: &AssemblyGraph, mode: ValidationMode) -> Vec<Finding> {
    let components = graph.connected_components();
    if components.len() <= 1 {
        return Vec::new();
    }
    // The largest component is the assembly's main body; ties go to the
    // component whose first piece sorts earliest.
    let main = components
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| a.len().cmp(&b.len()).then(ib.cmp(ia)))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut findings = Vec::new();
    for (i, component) in components.iter().enumerate() {
        if i == main {
            continue;
        }
        let names: Vec<String> = component
            .iter()
            .map(|&ix| graph.piece(ix).name.clone())
            .collect();
        if names.len() == 1 && graph.piece(component[0]).standalone {
            continue;
        }
        // Only a lone straggler is forgivable in permissive mode. A floating
        // multi-piece group is always a broken assembly.
        let severity = match mode {
            ValidationMode::Permissive if names.len() == 1 => Severity::Warning,
            _ => Severity::Error,
        };
        findings.push(Finding {
            severity,
            check: CheckName::Connectivity,
            message: format!(
                "{} not connected to the main assembly",
                if names.len() == 1 {
                    format!("piece '{}' is", names[0])
                } else {
                    format!("pieces {} form a separate group", quoted(&names))
                }
            ),
            pieces: names,
            suggestion: Some(
                "connect the group to the main assembly, or mark single pieces standalone"
                    .to_string(),
            ),
        });
    }
    findings
}

/// World axis-aligned bounding box of a resolved piece.
fn world_aabb(graph: &AssemblyGraph, poses: &PoseSet, ix: PieceIx) -> Option<(Point3, Point3)> {
    let pose = poses.pose(ix)?;
    let dims = graph.piece(ix).dims();
    let mut lo = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
    let mut hi = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    for corner in 0..8 {
        let local = Point3::new(
            if corner & 1 != 0 { dims.length } else { 0.0 },
            if corner & 2 != 0 { dims.width } else { 0.0 },
            if corner & 4 != 0 { dims.height } else { 0.0 },
        );
        let p = pose.apply_point(&local);
        for axis in 0..3 {
            lo[axis] = lo[axis].min(p[axis]);
            hi[axis] = hi[axis].max(p[axis]);
        }
    }
    Some((lo, hi))
}

fn check_collision(
    graph: &AssemblyGraph,
    poses: &PoseSet,
    mode: ValidationMode,
    tolerance_mm: f64,
) -> Vec<Finding> {
    // Every pose is an axis permutation of the local frame, so the world
    // box of a piece is exact, not a conservative hull.
    let boxes: Vec<Option<(Point3, Point3)>> = (0..graph.len())
        .map(|i| world_aabb(graph, poses, PieceIx(i)))
        .collect();

    let connected: BTreeSet<(PieceIx, PieceIx)> = (0..graph.connections().len())
        .map(|i| {
            let (a, b) = graph.ends(ConnIx(i));
            (a.min(b), a.max(b))
        })
        .collect();

    let mut findings = Vec::new();
    for i in 0..graph.len() {
        for j in (i + 1)..graph.len() {
            let (Some((lo_a, hi_a)), Some((lo_b, hi_b))) = (&boxes[i], &boxes[j]) else {
                continue;
            };
            let mut depth = f64::INFINITY;
            let mut volume = 1.0;
            for axis in 0..3 {
                let overlap = hi_a[axis].min(hi_b[axis]) - lo_a[axis].max(lo_b[axis]);
                depth = depth.min(overlap);
                volume *= overlap.max(0.0);
            }
            if depth <= tolerance_mm {
                continue;
            }
            let pair = (PieceIx(i), PieceIx(j));
            // Mating pieces interlock a little at the joint.
            if connected.contains(&pair) && volume < 100.0 {
                continue;
            }
            let severity = if mode == ValidationMode::Permissive && volume < 1000.0 {
                Severity::Warning
            } else {
                Severity::Error
            };
            let names = vec![
                graph.piece(pair.0).name.clone(),
                graph.piece(pair.1).name.clone(),
            ];
            findings.push(Finding {
                severity,
                check: CheckName::Collision,
                message: format!(
                    "pieces '{}' and '{}' overlap by {:.0} mm^3 ({:.1} mm deep)",
                    names[0], names[1], volume, depth,
                ),
                pieces: names,
                suggestion: Some("move one anchor or shorten a piece".to_string()),
            });
        }
    }
    findings
}

fn check_joint(graph: &AssemblyGraph, poses: &PoseSet, tolerance_mm: f64) -> Vec<Finding> {
    let mut findings = Vec::new();
    for i in 0..graph.connections().len() {
        let conn = graph.connection(ConnIx(i));
        let (a, b) = graph.ends(ConnIx(i));
        let (Some(pose_a), Some(pose_b)) = (poses.pose(a), poses.pose(b)) else {
            continue;
        };
        let pa = pose_a.apply_point(&conn.lhs.local_point());
        let pb = pose_b.apply_point(&conn.rhs.local_point());
        let gap = (pa - pb).norm();
        let na = pose_a.apply_vec(&conn.lhs.contact_normal());
        let nb = pose_b.apply_vec(&conn.rhs.contact_normal());
        let facing = na.dot(&nb);

        let names = vec![
            graph.piece(a).name.clone(),
            graph.piece(b).name.clone(),
        ];
        if gap > tolerance_mm {
            findings.push(Finding {
                severity: if gap > 1.0 {
                    Severity::Error
                } else {
                    Severity::Warning
                },
                check: CheckName::Joint,
                message: format!(
                    "anchors of '{}' and '{}' are {:.3} mm apart",
                    names[0], names[1], gap,
                ),
                pieces: names.clone(),
                suggestion: Some(
                    "an over-constrained loop elsewhere is pulling this joint open".to_string(),
                ),
            });
        }
        if facing > -1.0 + Tolerance::DEFAULT.angular {
            findings.push(Finding {
                severity: Severity::Error,
                check: CheckName::Joint,
                message: format!(
                    "contact faces of '{}' and '{}' do not press together",
                    names[0], names[1],
                ),
                pieces: names,
                suggestion: None,
            });
        }
    }
    findings
}

fn check_structural(
    graph: &AssemblyGraph,
    mode: ValidationMode,
    min_connections: usize,
) -> Vec<Finding> {
    if graph.len() <= 1 {
        return Vec::new();
    }
    let mut findings = Vec::new();
    for &ix in graph.order() {
        let piece = graph.piece(ix);
        if piece.standalone {
            continue;
        }
        let count = graph.neighbors(ix).len();
        if count >= min_connections {
            continue;
        }
        let severity = if count == 0 || mode == ValidationMode::Strict {
            Severity::Error
        } else {
            Severity::Warning
        };
        findings.push(Finding {
            severity,
            check: CheckName::Structural,
            message: format!(
                "piece '{}' has {} connection(s); at least {} keep a piece from pivoting",
                piece.name, count, min_connections,
            ),
            pieces: vec![piece.name.clone()],
            suggestion: Some("add a second fastening point or a brace".to_string()),
        });
    }
    findings
}

fn check_assembly_order(graph: &AssemblyGraph) -> Vec<Finding> {
    let mut hinted: Vec<(u32, ConnIx)> = graph
        .connections()
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.build_order.map(|o| (o, ConnIx(i))))
        .collect();
    if hinted.is_empty() {
        return Vec::new();
    }
    hinted.sort();

    let mut findings = Vec::new();
    if hinted.len() < graph.connections().len() {
        findings.push(Finding {
            severity: Severity::Info,
            check: CheckName::AssemblyOrder,
            message: format!(
                "only {} of {} connections carry build-order hints",
                hinted.len(),
                graph.connections().len(),
            ),
            pieces: Vec::new(),
            suggestion: None,
        });
    }
    for pair in hinted.windows(2) {
        let ((prev, _), (next, next_ix)) = (pair[0], pair[1]);
        if next == prev {
            let (a, b) = graph.ends(next_ix);
            findings.push(Finding {
                severity: Severity::Warning,
                check: CheckName::AssemblyOrder,
                message: format!("build order {} is assigned to more than one connection", next),
                pieces: vec![graph.piece(a).name.clone(), graph.piece(b).name.clone()],
                suggestion: Some("give each step a distinct order".to_string()),
            });
        } else if next > prev + 1 {
            findings.push(Finding {
                severity: Severity::Info,
                check: CheckName::AssemblyOrder,
                message: format!("build order jumps from {} to {}", prev, next),
                pieces: Vec::new(),
                suggestion: None,
            });
        }
    }

    // Feasibility: walking hinted steps in order, each joint must either
    // start a new sub-assembly, extend one, or merge two. A joint whose
    // pieces are already rigidly part of the same sub-assembly closes a
    // loop and cannot be slid into place.
    //
    // A step naming a piece no earlier step has touched is not an
    // ordering violation: both-fresh starts a sub-assembly and one-fresh
    // extends one, so pieces carry no install dependencies of their own.
    // The only sequence a rigid body cannot realize is the same-group
    // join below.
    let mut group: Vec<usize> = (0..graph.len()).collect();
    fn find(group: &mut Vec<usize>, mut i: usize) -> usize {
        while group[i] != i {
            group[i] = group[group[i]];
            i = group[i];
        }
        i
    }
    for &(order, ix) in &hinted {
        let (a, b) = graph.ends(ix);
        let (ra, rb) = (find(&mut group, a.0), find(&mut group, b.0));
        if ra == rb {
            findings.push(Finding {
                severity: Severity::Warning,
                check: CheckName::AssemblyOrder,
                message: format!(
                    "step {} joins '{}' and '{}' after both are already fixed in the same \
                     sub-assembly",
                    order,
                    graph.piece(a).name,
                    graph.piece(b).name,
                ),
                pieces: vec![graph.piece(a).name.clone(), graph.piece(b).name.clone()],
                suggestion: Some("fasten loop-closing joints before the loop is rigid".to_string()),
            });
        } else {
            group[ra] = rb;
        }
    }
    findings
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(", ")
}
