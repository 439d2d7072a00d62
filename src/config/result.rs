use crate::result::DialogError;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read dialog config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse dialog config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("button {text:?} of node {node_id:?} refers to unknown action {action:?}")]
    UnknownAction {
        node_id: String,
        text: String,
        action: String,
    },
    #[error("invalid dialog: {0}")]
    Dialog(#[from] DialogError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
