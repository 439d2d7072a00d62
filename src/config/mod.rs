pub mod button;
pub mod result;

use std::{collections::HashMap, path::Path};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    dialog::Dialog,
    node::Node,
    transport::{CallbackHandler, TextFormat},
};
use button::ButtonDefinition;
use result::ConfigResult;

/// Handlers available to `action` buttons, by name
pub type Actions = HashMap<String, CallbackHandler>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeDefinition {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub keyboard: Vec<Vec<ButtonDefinition>>,
}

impl NodeDefinition {
    pub fn resolve(self, actions: &Actions) -> ConfigResult<Node> {
        let id = self.id;
        let keyboard = self
            .keyboard
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|b| b.resolve(&id, actions))
                    .collect::<ConfigResult<Vec<_>>>()
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Node::new(id, self.text).with_keyboard(keyboard))
    }
}

/// Dialog described in json:
///
/// ```json
/// {
///     "edit_in_place": true,
///     "format": "html",
///     "nodes": [
///         { "id": "start", "text": "Hi!", "keyboard": [[{ "text": "About", "node": "about" }]] },
///         { "id": "about", "text": "...", "keyboard": [[{ "text": "Ping", "action": "ping" }]] }
///     ]
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogConfig {
    #[serde(default)]
    pub edit_in_place: bool,
    #[serde(default)]
    pub format: TextFormat,
    pub nodes: Vec<NodeDefinition>,
}

impl DialogConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        info!("Loading dialog from {}", path.as_ref().display());
        let json = std::fs::read_to_string(path)?;

        Self::from_json(&json)
    }

    pub fn build(self, actions: &Actions) -> ConfigResult<Dialog> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|n| n.resolve(actions))
            .collect::<ConfigResult<Vec<_>>>()?;

        let dialog = Dialog::new(nodes)?.with_format(self.format);
        Ok(match self.edit_in_place {
            true => dialog.edit_in_place(),
            false => dialog,
        })
    }
}
