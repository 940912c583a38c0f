use thiserror::Error;

pub type Result<T> = std::result::Result<T, RollupError>;

/// Reasons a node set cannot be rolled up.
///
/// Every variant is raised during validation, before any cost is moved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RollupError {
    #[error("Duplicate node id: {id}")]
    DuplicateId { id: String },

    #[error("Node {id} references missing parent {parent}")]
    DanglingParent { id: String, parent: String },

    #[error("Cycle detected through node {id}")]
    CycleDetected { id: String },

    #[error("Node not found: {0}")]
    NodeNotFound(String),
}

impl RollupError {
    pub fn duplicate_id(id: impl ToString) -> Self {
        Self::DuplicateId { id: id.to_string() }
    }

    pub fn dangling_parent(id: impl ToString, parent: impl ToString) -> Self {
        Self::DanglingParent {
            id: id.to_string(),
            parent: parent.to_string(),
        }
    }

    pub fn cycle_detected(id: impl ToString) -> Self {
        Self::CycleDetected { id: id.to_string() }
    }

    /// Id of the node the error was raised for.
    pub fn node_id(&self) -> &str {
        match self {
            Self::DuplicateId { id }
            | Self::DanglingParent { id, .. }
            | Self::CycleDetected { id } => id,
            Self::NodeNotFound(id) => id,
        }
    }
}
