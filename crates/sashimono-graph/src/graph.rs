//! Indexed assembly graph.

use std::collections::BTreeMap;

use sashimono_model::{Connection, Piece};

use crate::GraphError;

/// Index of a piece within its [`AssemblyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceIx(pub usize);

/// Index of a connection within its [`AssemblyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnIx(pub usize);

/// Pieces and connections indexed for traversal.
///
/// Building the graph checks only referential integrity: names are
/// unique, every connection names two distinct known pieces. All
/// iteration orders derived from the graph depend on piece names, not
/// declaration order, so assemblies that differ only in declaration
/// order resolve identically.
#[derive(Debug, Clone)]
pub struct AssemblyGraph {
    pieces: Vec<Piece>,
    connections: Vec<Connection>,
    by_name: BTreeMap<String, PieceIx>,
    conn_ends: Vec<(PieceIx, PieceIx)>,
    /// Per piece, neighbors sorted by name then connection index.
    adjacency: Vec<Vec<(PieceIx, ConnIx)>>,
    /// All piece indices in name order.
    order: Vec<PieceIx>,
}

impl AssemblyGraph {
    /// Index a set of declarations.
    pub fn build(pieces: Vec<Piece>, connections: Vec<Connection>) -> Result<Self, GraphError> {
        let mut by_name = BTreeMap::new();
        for (i, piece) in pieces.iter().enumerate() {
            if by_name.insert(piece.name.clone(), PieceIx(i)).is_some() {
                return Err(GraphError::DuplicatePieceName(piece.name.clone()));
            }
        }

        let mut conn_ends = Vec::with_capacity(connections.len());
        let mut adjacency = vec![Vec::new(); pieces.len()];
        for (i, conn) in connections.iter().enumerate() {
            let lookup = |name: &str| {
                by_name
                    .get(name)
                    .copied()
                    .ok_or_else(|| GraphError::UnknownPieceReference {
                        connection: i,
                        piece: name.to_string(),
                    })
            };
            let a = lookup(&conn.lhs.piece().name)?;
            let b = lookup(&conn.rhs.piece().name)?;
            if a == b {
                return Err(GraphError::SelfConnection {
                    connection: i,
                    piece: conn.lhs.piece().name.clone(),
                });
            }
            conn_ends.push((a, b));
            adjacency[a.0].push((b, ConnIx(i)));
            adjacency[b.0].push((a, ConnIx(i)));
        }

        for list in &mut adjacency {
            list.sort_by(|(a, ca), (b, cb)| {
                pieces[a.0]
                    .name
                    .cmp(&pieces[b.0].name)
                    .then(ca.0.cmp(&cb.0))
            });
        }

        let order: Vec<PieceIx> = by_name.values().copied().collect();

        Ok(Self {
            pieces,
            connections,
            by_name,
            conn_ends,
            adjacency,
            order,
        })
    }

    /// Number of pieces.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// True when the graph holds no pieces.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Piece by index.
    pub fn piece(&self, ix: PieceIx) -> &Piece {
        &self.pieces[ix.0]
    }

    /// All pieces in declaration order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Connection by index.
    pub fn connection(&self, ix: ConnIx) -> &Connection {
        &self.connections[ix.0]
    }

    /// All connections in declaration order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Endpoint piece indices of a connection, lhs then rhs.
    pub fn ends(&self, ix: ConnIx) -> (PieceIx, PieceIx) {
        self.conn_ends[ix.0]
    }

    /// Look up a piece by name.
    pub fn index_of(&self, name: &str) -> Option<PieceIx> {
        self.by_name.get(name).copied()
    }

    /// Neighbors of a piece, in name order.
    pub fn neighbors(&self, ix: PieceIx) -> &[(PieceIx, ConnIx)] {
        &self.adjacency[ix.0]
    }

    /// All piece indices in name order.
    pub fn order(&self) -> &[PieceIx] {
        &self.order
    }

    /// Default resolution root: the first piece in name order.
    pub fn root(&self) -> Option<PieceIx> {
        self.order.first().copied()
    }

    /// Connected components, each in name order, ordered by their first
    /// member's name.
    pub fn connected_components(&self) -> Vec<Vec<PieceIx>> {
        let mut seen = vec![false; self.pieces.len()];
        let mut components = Vec::new();
        for &start in &self.order {
            if seen[start.0] {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = std::collections::VecDeque::from([start]);
            seen[start.0] = true;
            while let Some(ix) = queue.pop_front() {
                component.push(ix);
                for &(next, _) in self.neighbors(ix) {
                    if !seen[next.0] {
                        seen[next.0] = true;
                        queue.push_back(next);
                    }
                }
            }
            component.sort_by(|a, b| self.pieces[a.0].name.cmp(&self.pieces[b.0].name));
            components.push(component);
        }
        components
    }

    /// Number of independent cycles (connections beyond a spanning
    /// forest). Parallel connections between the same pair count.
    pub fn cycle_count(&self) -> usize {
        let components = self.connected_components().len();
        (self.connections.len() + components).saturating_sub(self.pieces.len())
    }

    /// True when at least one cycle exists.
    pub fn contains_cycle(&self) -> bool {
        self.cycle_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sashimono_geom::{Face, Offset};
    use sashimono_model::{Anchor, BoundAnchor, LumberKind};

    fn stud(name: &str) -> Piece {
        Piece::create(LumberKind::TwoByFour, 400.0, name).unwrap()
    }

    fn link(a: &Piece, b: &Piece) -> Connection {
        let la = BoundAnchor::bind(
            a,
            Anchor::new(Face::Top, Face::Front, Offset::FromMin(0.0)).unwrap(),
        )
        .unwrap();
        let rb = BoundAnchor::bind(
            b,
            Anchor::new(Face::Down, Face::Front, Offset::FromMin(0.0)).unwrap(),
        )
        .unwrap();
        Connection::of(la, rb)
    }

    #[test]
    fn test_build_rejects_duplicate_names() {
        let err = AssemblyGraph::build(vec![stud("a"), stud("a")], vec![]).unwrap_err();
        assert_eq!(err, GraphError::DuplicatePieceName("a".into()));
    }

    #[test]
    fn test_build_rejects_unknown_reference() {
        let a = stud("a");
        let ghost = stud("ghost");
        let conn = link(&a, &ghost);
        let err = AssemblyGraph::build(vec![a], vec![conn]).unwrap_err();
        assert!(matches!(
            err,
            GraphError::UnknownPieceReference { connection: 0, .. }
        ));
    }

    #[test]
    fn test_build_rejects_self_connection() {
        let a = stud("a");
        let conn = link(&a, &a);
        let err = AssemblyGraph::build(vec![a], vec![conn]).unwrap_err();
        assert!(matches!(err, GraphError::SelfConnection { .. }));
    }

    #[test]
    fn test_order_is_by_name_not_declaration() {
        let graph = AssemblyGraph::build(vec![stud("z"), stud("a"), stud("m")], vec![]).unwrap();
        let names: Vec<&str> = graph
            .order()
            .iter()
            .map(|&ix| graph.piece(ix).name.as_str())
            .collect();
        assert_eq!(names, ["a", "m", "z"]);
        assert_eq!(graph.root(), graph.index_of("a"));
    }

    #[test]
    fn test_components_and_cycles() {
        let a = stud("a");
        let b = stud("b");
        let c = stud("c");
        let d = stud("d");
        let conns = vec![link(&a, &b), link(&b, &c), link(&c, &a)];
        let graph = AssemblyGraph::build(vec![a, b, c, d], conns).unwrap();
        let components = graph.connected_components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].len(), 3);
        assert_eq!(components[1].len(), 1);
        assert_eq!(graph.cycle_count(), 1);
        assert!(graph.contains_cycle());
    }
}
