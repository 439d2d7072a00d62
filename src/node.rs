use std::collections::{hash_map::Entry, HashMap};
use std::fmt;

use itertools::Itertools;
use log::warn;

use crate::{
    callback_data::{CallbackData, Namespace, MAX_CALLBACK_DATA_LEN, SEPARATOR},
    result::{DialogError, DialogResult},
    transport::{CallbackHandler, Keyboard, KeyboardButton},
};

#[derive(Clone)]
pub enum ButtonTarget {
    Node(String),
    Url(String),
    Action(CallbackHandler),
}

impl fmt::Debug for ButtonTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonTarget::Node(id) => f.debug_tuple("Node").field(id).finish(),
            ButtonTarget::Url(url) => f.debug_tuple("Url").field(url).finish(),
            ButtonTarget::Action(_) => f.write_str("Action(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Button {
    label: String,
    target: ButtonTarget,
}

impl Button {
    /// button moving user to node `node_id`
    pub fn node<S: Into<String>, I: Into<String>>(label: S, node_id: I) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Node(node_id.into()),
        }
    }

    pub fn url<S: Into<String>, U: Into<String>>(label: S, url: U) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Url(url.into()),
        }
    }

    /// Button calling `handler` on press. Label is a part of the callback data,
    /// so it should be unique within the node and contain no `_`.
    pub fn action<S: Into<String>>(label: S, handler: CallbackHandler) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Action(handler),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> &ButtonTarget {
        &self.target
    }

    fn layout(&self, ns: &Namespace, parent_id: &str) -> KeyboardButton {
        match &self.target {
            ButtonTarget::Url(url) => KeyboardButton::url(&self.label, url),
            ButtonTarget::Action(_) => KeyboardButton::callback(
                &self.label,
                ns.encode(&CallbackData::Action {
                    parent_id,
                    label: &self.label,
                }),
            ),
            ButtonTarget::Node(node_id) => {
                KeyboardButton::callback(&self.label, ns.encode(&CallbackData::Navigate { node_id }))
            }
        }
    }
}

/// One screen of a dialog
#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    text: String,
    keyboard: Vec<Vec<Button>>,
}

impl Node {
    pub fn new<I: Into<String>, T: Into<String>>(id: I, text: T) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            keyboard: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Vec<Button>) -> Self {
        self.keyboard.push(row);
        self
    }

    pub fn with_keyboard(self, keyboard: Vec<Vec<Button>>) -> Self {
        Self { keyboard, ..self }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.keyboard.iter().flatten()
    }

    /// first button in row-major order with exactly this label
    pub fn find_button(&self, label: &str) -> Option<&Button> {
        self.buttons().find(|b| b.label == label)
    }

    /// None if node has no keyboard
    pub fn keyboard(&self, ns: &Namespace) -> Option<Keyboard> {
        if self.keyboard.is_empty() {
            return None;
        }

        let rows = self
            .keyboard
            .iter()
            .map(|row| row.iter().map(|b| b.layout(ns, &self.id)).collect_vec())
            .collect_vec();

        Some(Keyboard::new(rows))
    }
}

/// Immutable set of nodes, indexed by id
#[derive(Debug, Clone)]
pub struct NodeGraph {
    nodes: HashMap<String, Node>,
}

impl NodeGraph {
    pub fn new<N: IntoIterator<Item = Node>>(nodes: N) -> DialogResult<Self> {
        let mut index = HashMap::new();
        for node in nodes {
            if node.id.is_empty() || node.id.contains(SEPARATOR) {
                return Err(DialogError::InvalidNodeId(node.id));
            }
            match index.entry(node.id.clone()) {
                Entry::Occupied(_) => return Err(DialogError::DuplicateNode(node.id)),
                Entry::Vacant(entry) => {
                    entry.insert(node);
                }
            }
        }

        Ok(Self { nodes: index })
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// warns about buttons telegram won't accept and targets outside of the graph
    pub(crate) fn lint(&self, ns: &Namespace) {
        for node in self.nodes.values().sorted_by(|a, b| a.id.cmp(&b.id)) {
            for button in node.buttons() {
                if let ButtonTarget::Node(target) = &button.target {
                    if !self.nodes.contains_key(target) {
                        warn!(
                            "Button {:?} of node {:?} points to unknown node {target:?}",
                            button.label, node.id
                        );
                    }
                }
                let layout = button.layout(ns, &node.id);
                let len = layout.callback_data().map_or(0, str::len);
                if len > MAX_CALLBACK_DATA_LEN {
                    warn!(
                        "Callback data of button {:?} of node {:?} is {len} bytes long, telegram accepts at most {MAX_CALLBACK_DATA_LEN}",
                        button.label, node.id
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::transport::{callback_handler, KeyboardButtonKind};

    fn noop() -> CallbackHandler {
        callback_handler(|_, _| async {})
    }

    #[test]
    fn test_find_button_first_wins() {
        let node = Node::new("a", "A")
            .with_row(vec![Button::node("Go", "b"), Button::url("Site", "https://a.b")])
            .with_row(vec![Button::node("Go", "c")]);

        let button = node.find_button("Go").unwrap();
        assert!(matches!(button.target(), ButtonTarget::Node(id) if id == "b"));
        assert!(node.find_button("Nope").is_none());
    }

    #[test]
    fn test_keyboard_layout() {
        let ns = Namespace::random();
        let node = Node::new("a", "A")
            .with_row(vec![Button::node("Go", "b"), Button::url("Site", "https://a.b")])
            .with_row(vec![Button::action("Click", noop())]);

        let keyboard = node.keyboard(&ns).unwrap();

        assert_eq!(keyboard.rows.len(), 2);
        assert_eq!(keyboard.rows[0].len(), 2);
        let go = keyboard.find("Go").unwrap().callback_data().unwrap();
        assert_eq!(
            ns.decode(go).unwrap(),
            CallbackData::Navigate { node_id: "b" }
        );
        assert_eq!(
            keyboard.find("Site").unwrap().kind,
            KeyboardButtonKind::Url("https://a.b".to_string())
        );
        let click = keyboard.find("Click").unwrap().callback_data().unwrap();
        assert_eq!(
            ns.decode(click).unwrap(),
            CallbackData::Action {
                parent_id: "a",
                label: "Click"
            }
        );
    }

    #[test]
    fn test_every_button_decodes_back() {
        let ns = Namespace::random();
        let ids = vec![
            "home".to_string(),
            "42".to_string(),
            "главная".to_string(),
            "main menu".to_string(),
            "Zq8Lr2Vb6Nt4Pw0K".to_string(),
            format!("{}Home", ns.widget_prefix()),
        ];
        let labels = ["Click", "Нажми меня", "", "007", "🚀 Go", "two words"];
        let nodes = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let target = &ids[(i + 1) % ids.len()];
                Node::new(id.as_str(), "text")
                    .with_row(labels.iter().map(|l| Button::action(*l, noop())).collect())
                    .with_row(
                        labels
                            .iter()
                            .map(|l| Button::node(*l, target.as_str()))
                            .collect(),
                    )
            })
            .collect_vec();
        let graph = NodeGraph::new(nodes).unwrap();

        let mut checked = 0;
        for node in graph.nodes() {
            let keyboard = node.keyboard(&ns).unwrap();
            for (button, layout) in node.buttons().zip(keyboard.buttons()) {
                assert_eq!(layout.label, button.label());
                let decoded = ns.decode(layout.callback_data().unwrap()).unwrap();
                match button.target() {
                    ButtonTarget::Action(_) => assert_eq!(
                        decoded,
                        CallbackData::Action {
                            parent_id: node.id(),
                            label: button.label()
                        }
                    ),
                    ButtonTarget::Node(target) => {
                        assert_eq!(decoded, CallbackData::Navigate { node_id: target })
                    }
                    ButtonTarget::Url(_) => panic!("no url buttons in this graph"),
                }
                checked += 1;
            }
        }

        assert_eq!(checked, ids.len() * labels.len() * 2);
    }

    #[test]
    fn test_empty_keyboard() {
        let ns = Namespace::random();
        assert!(Node::new("a", "A").keyboard(&ns).is_none());
    }

    #[test]
    fn test_graph_lookup() {
        let graph = NodeGraph::new(vec![Node::new("a", "A"), Node::new("b", "B")]).unwrap();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.get("b").unwrap().text(), "B");
        assert!(graph.get("c").is_none());
    }

    #[test]
    fn test_graph_duplicate_node() {
        let err = NodeGraph::new(vec![Node::new("a", "A"), Node::new("a", "B")]).unwrap_err();

        assert!(matches!(err, DialogError::DuplicateNode(id) if id == "a"));
    }

    #[test]
    fn test_graph_invalid_node_id() {
        let err = NodeGraph::new(vec![Node::new("main_menu", "A")]).unwrap_err();
        assert!(matches!(err, DialogError::InvalidNodeId(id) if id == "main_menu"));

        let err = NodeGraph::new(vec![Node::new("", "A")]).unwrap_err();
        assert!(matches!(err, DialogError::InvalidNodeId(_)));
    }
}
