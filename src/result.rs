use crate::transport::TransportError;

#[derive(thiserror::Error, Debug)]
pub enum DialogError {
    #[error("failed to find node with id {0:?}")]
    NodeNotFound(String),
    #[error("failed to find button with text {label:?} on node {node_id:?}")]
    ButtonNotFound { node_id: String, label: String },
    #[error("failed to answer callback query: {0}")]
    AcknowledgeFailed(String),
    #[error("failed to render node: {0}")]
    RenderFailed(#[source] TransportError),
    #[error("malformed callback data: {0:?}")]
    MalformedPayload(String),
    #[error("node id {0:?} is used more than once")]
    DuplicateNode(String),
    #[error("invalid node id {0:?}: must be non-empty and contain no separator")]
    InvalidNodeId(String),
}

pub type DialogResult<T> = Result<T, DialogError>;
