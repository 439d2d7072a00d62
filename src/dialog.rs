
use std::fmt;
use std::sync::{Arc, OnceLock};

use log::{debug, error, info, warn};

use crate::{
    callback_data::{CallbackData, DecodeError, Namespace},
    node::{ButtonTarget, Node, NodeGraph},
    result::{DialogError, DialogResult},
    transport::{
        callback_handler, CallbackEvent, MessageRef, RouteHandle, TextFormat, Transport,
    },
};

/// Receives every error raised while handling a button press
pub type ErrorSink = Arc<dyn Fn(DialogError) + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// answer navigation with a new message
    #[default]
    Resend,
    /// replace text and keyboard of the pressed message
    EditInPlace,
}

fn log_error(err: DialogError) {
    error!("[dialog] {err}");
}

/// Stateless navigation over a [`NodeGraph`].
///
/// All navigation state lives in the callback data of sent buttons, so a
/// dialog never changes after construction and is shared freely between
/// concurrent callback handlers. Callback data embeds random tokens generated
/// here, so buttons sent before a restart stop working after it.
pub struct Dialog {
    namespace: Namespace,
    graph: NodeGraph,
    mode: RenderMode,
    format: TextFormat,
    on_error: ErrorSink,
    route: OnceLock<RouteHandle>,
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("prefix", &self.prefix())
            .field("mode", &self.mode)
            .field("format", &self.format)
            .field("nodes", &self.graph.len())
            .field("route", &self.route.get())
            .finish()
    }
}

impl Dialog {
    pub fn new<N: IntoIterator<Item = Node>>(nodes: N) -> DialogResult<Self> {
        let namespace = Namespace::random();
        let graph = NodeGraph::new(nodes)?;
        graph.lint(&namespace);

        Ok(Self {
            namespace,
            graph,
            mode: RenderMode::Resend,
            format: TextFormat::Markdown,
            on_error: Arc::new(log_error),
            route: OnceLock::new(),
        })
    }

    pub fn with_error_sink<F>(self, on_error: F) -> Self
    where
        F: Fn(DialogError) + Send + Sync + 'static,
    {
        Self {
            on_error: Arc::new(on_error),
            ..self
        }
    }

    pub fn edit_in_place(self) -> Self {
        Self {
            mode: RenderMode::EditInPlace,
            ..self
        }
    }

    pub fn with_format(self, format: TextFormat) -> Self {
        Self { format, ..self }
    }

    /// prefix of all callback data of this dialog
    pub fn prefix(&self) -> &str {
        self.namespace.widget_prefix()
    }

    pub fn render_mode(&self) -> RenderMode {
        self.mode
    }

    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    /// Sends node `node_id` to `chat_id`.
    ///
    /// The first successful call registers the callback route of this dialog on
    /// `transport`; later calls reuse it, even with another transport.
    pub async fn show(
        self: &Arc<Self>,
        transport: Arc<dyn Transport>,
        chat_id: i64,
        node_id: &str,
    ) -> DialogResult<MessageRef> {
        let node = self
            .graph
            .get(node_id)
            .ok_or_else(|| DialogError::NodeNotFound(node_id.to_string()))?;

        self.route.get_or_init(|| {
            let dialog = Arc::clone(self);
            transport.register_route(
                self.prefix(),
                callback_handler(move |transport, event| {
                    let dialog = Arc::clone(&dialog);
                    async move { dialog.dispatch(transport, event).await }
                }),
            )
        });

        info!("Showing node {node_id:?} in chat {chat_id}");
        transport
            .send(chat_id, node.text(), self.format, node.keyboard(&self.namespace))
            .await
            .map_err(DialogError::RenderFailed)
    }

    /// Handles a button press. Errors go to the error sink.
    pub async fn dispatch(&self, transport: Arc<dyn Transport>, event: CallbackEvent) {
        match transport.acknowledge(&event.id).await {
            Ok(true) => {}
            Ok(false) => (self.on_error)(DialogError::AcknowledgeFailed(format!(
                "callback query {} was not answered",
                event.id
            ))),
            Err(err) => (self.on_error)(DialogError::AcknowledgeFailed(err.to_string())),
        }

        let data = match event.data.as_deref() {
            Some(data) => data,
            None => {
                debug!("Callback query {} has no data, ignoring", event.id);
                return;
            }
        };

        match self.namespace.decode(data) {
            Ok(CallbackData::Action { parent_id, label }) => {
                self.invoke_action(transport, &event, parent_id, label)
                    .await
            }
            Ok(CallbackData::Navigate { node_id }) => {
                self.navigate(transport.as_ref(), &event, node_id).await
            }
            Err(DecodeError::ForeignPrefix(data)) => {
                debug!("Ignoring foreign callback data {data:?}");
            }
            Err(err @ DecodeError::MissingSeparator(_)) => {
                (self.on_error)(DialogError::MalformedPayload(err.to_string()))
            }
        }
    }

    async fn invoke_action(
        &self,
        transport: Arc<dyn Transport>,
        event: &CallbackEvent,
        parent_id: &str,
        label: &str,
    ) {
        let node = match self.graph.get(parent_id) {
            Some(node) => node,
            None => return (self.on_error)(DialogError::NodeNotFound(parent_id.to_string())),
        };
        let handler = match node.find_button(label).map(|b| b.target()) {
            Some(ButtonTarget::Action(handler)) => Arc::clone(handler),
            _ => {
                return (self.on_error)(DialogError::ButtonNotFound {
                    node_id: parent_id.to_string(),
                    label: label.to_string(),
                })
            }
        };

        debug!("Calling action {label:?} of node {parent_id:?}");
        handler(transport, event.clone()).await;
    }

    async fn navigate(&self, transport: &dyn Transport, event: &CallbackEvent, node_id: &str) {
        let node = match self.graph.get(node_id) {
            Some(node) => node,
            None => return (self.on_error)(DialogError::NodeNotFound(node_id.to_string())),
        };
        let keyboard = node.keyboard(&self.namespace);

        let result = match (self.mode, event.message) {
            (RenderMode::EditInPlace, Some(message)) => {
                transport
                    .edit(message, node.text(), self.format, keyboard)
                    .await
            }
            (mode, _) => {
                if mode == RenderMode::EditInPlace {
                    warn!("Fallback into sending message instead of editing because pressed message is not accessible");
                }
                transport
                    .send(event.chat_id, node.text(), self.format, keyboard)
                    .await
                    .map(|_| ())
            }
        };

        if let Err(err) = result {
            (self.on_error)(DialogError::RenderFailed(err));
        }
    }
}
