use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::node::Button;

use super::{
    result::{ConfigError, ConfigResult},
    Actions,
};

/// Button as written in config, variant is picked by the present key.
/// Exactly one of `node`, `url` and `action` must be set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged, try_from = "RawButton")]
pub enum ButtonDefinition {
    Node { text: String, node: String },
    Url { text: String, url: String },
    Action { text: String, action: String },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawButton {
    text: String,
    node: Option<String>,
    url: Option<String>,
    action: Option<String>,
}

impl TryFrom<RawButton> for ButtonDefinition {
    type Error = String;

    fn try_from(raw: RawButton) -> Result<Self, Self::Error> {
        let text = raw.text;
        match (raw.node, raw.url, raw.action) {
            (Some(node), None, None) => Ok(ButtonDefinition::Node { text, node }),
            (None, Some(url), None) => Ok(ButtonDefinition::Url { text, url }),
            (None, None, Some(action)) => Ok(ButtonDefinition::Action { text, action }),
            (None, None, None) => Err(format!(
                "button {text:?} has no target, expected one of `node`, `url`, `action`"
            )),
            _ => Err(format!(
                "button {text:?} has more than one of `node`, `url`, `action`"
            )),
        }
    }
}

impl ButtonDefinition {
    pub fn text(&self) -> &str {
        match self {
            ButtonDefinition::Node { text, .. }
            | ButtonDefinition::Url { text, .. }
            | ButtonDefinition::Action { text, .. } => text,
        }
    }

    pub fn resolve(self, node_id: &str, actions: &Actions) -> ConfigResult<Button> {
        match self {
            ButtonDefinition::Node { text, node } => Ok(Button::node(text, node)),
            ButtonDefinition::Url { text, url } => Ok(Button::url(text, url)),
            ButtonDefinition::Action { text, action } => match actions.get(&action) {
                Some(handler) => Ok(Button::action(text, Arc::clone(handler))),
                None => Err(ConfigError::UnknownAction {
                    node_id: node_id.to_string(),
                    text,
                    action,
                }),
            },
        }
    }
}
