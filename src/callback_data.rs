use rand::{distributions::Alphanumeric, Rng};

/// Separates parent node id from button label in action payloads
pub const SEPARATOR: char = '_';

/// Length of every random token of a [`Namespace`]
pub const TOKEN_LEN: usize = 16;

/// Telegram rejects inline buttons with longer callback data
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

/// Decoded form of the callback data attached to a dialog button.
///
/// Wire formats:
/// - `<widget><node><node_id>`
/// - `<widget><action><parent_id>_<label>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackData<'a> {
    Navigate { node_id: &'a str },
    Action { parent_id: &'a str, label: &'a str },
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("callback data does not belong to this dialog: {0:?}")]
    ForeignPrefix(String),
    #[error("action callback data has no separator: {0:?}")]
    MissingSeparator(String),
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Random tokens partitioning callback data into the address space of one dialog.
///
/// Tokens are alphanumeric, so they never contain [`SEPARATOR`]. Collision with
/// foreign callback data or with node ids is improbable, not impossible.
#[derive(Debug, Clone)]
pub struct Namespace {
    widget: String,
    node: String,
    action: String,
}

fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

impl Namespace {
    pub fn random() -> Self {
        let node = random_token();
        let action = loop {
            let token = random_token();
            if token != node {
                break token;
            }
        };

        Self {
            widget: random_token(),
            node,
            action,
        }
    }

    /// prefix of every callback data this namespace produces
    pub fn widget_prefix(&self) -> &str {
        &self.widget
    }

    pub fn encode(&self, data: &CallbackData<'_>) -> String {
        match data {
            CallbackData::Navigate { node_id } => {
                format!("{}{}{}", self.widget, self.node, node_id)
            }
            CallbackData::Action { parent_id, label } => {
                format!(
                    "{}{}{}{}{}",
                    self.widget, self.action, parent_id, SEPARATOR, label
                )
            }
        }
    }

    /// Labels containing [`SEPARATOR`] come back truncated after the first one,
    /// callers must keep separators out of action labels.
    pub fn decode<'a>(&self, data: &'a str) -> DecodeResult<CallbackData<'a>> {
        let rest = data
            .strip_prefix(self.widget.as_str())
            .ok_or_else(|| DecodeError::ForeignPrefix(data.to_string()))?;

        if let Some(action) = rest.strip_prefix(self.action.as_str()) {
            let (parent_id, label) = action
                .split_once(SEPARATOR)
                .ok_or_else(|| DecodeError::MissingSeparator(data.to_string()))?;
            // everything after a second separator is dropped
            let label = label.split(SEPARATOR).next().unwrap_or(label);
            return Ok(CallbackData::Action { parent_id, label });
        }

        let node_id = rest.strip_prefix(self.node.as_str()).unwrap_or(rest);
        Ok(CallbackData::Navigate { node_id })
    }
}
