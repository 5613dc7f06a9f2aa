use crate::node::NodeId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when manipulating the scene tree.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested node ID does not exist in the tree.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// The root node cannot be detached or removed.
    #[error("the root node cannot be removed")]
    RootRemoval,

    /// Attaching the node would make it its own ancestor.
    #[error("cannot attach {child} under its own descendant {parent}")]
    Cycle {
        /// The node being attached.
        child: NodeId,
        /// The requested parent.
        parent: NodeId,
    },
}
