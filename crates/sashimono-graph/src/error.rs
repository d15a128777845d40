use thiserror::Error;

/// Errors raised while building an [`crate::AssemblyGraph`].
///
/// These are the only hard failures in the crate; everything downstream
/// of a well-formed graph is reported as findings instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two pieces share a name.
    #[error("duplicate piece name '{0}'")]
    DuplicatePieceName(String),

    /// A connection anchors to a piece that is not in the piece list.
    #[error("connection {connection} references unknown piece '{piece}'")]
    UnknownPieceReference {
        /// Index of the connection in declaration order.
        connection: usize,
        /// The unresolved piece name.
        piece: String,
    },

    /// A connection joins a piece to itself.
    #[error("connection {connection} joins piece '{piece}' to itself")]
    SelfConnection {
        /// Index of the connection in declaration order.
        connection: usize,
        /// The piece named on both sides.
        piece: String,
    },
}
