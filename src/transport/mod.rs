pub mod keyboard;
pub mod routes;
pub mod telegram;

#[cfg(test)]
pub(crate) mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use keyboard::{Keyboard, KeyboardButton, KeyboardButtonKind};
pub use routes::{RouteHandle, RouteTable};

/// Handler of a callback event, used both for registered routes and for
/// action buttons
pub type CallbackHandler =
    Arc<dyn Fn(Arc<dyn Transport>, CallbackEvent) -> BoxFuture<'static, ()> + Send + Sync>;

/// Wraps async fn into [`CallbackHandler`]
pub fn callback_handler<F, Fut>(f: F) -> CallbackHandler
where
    F: Fn(Arc<dyn Transport>, CallbackEvent) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    Arc::new(move |transport, event| Box::pin(f(transport, event)))
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
    /// legacy telegram markdown
    #[default]
    Markdown,
    MarkdownV2,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i32,
}

/// User pressed an inline button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEvent {
    pub id: String,
    pub data: Option<String>,
    pub chat_id: i64,
    pub user_id: u64,
    /// message carrying the button, None if it is too old to be accessed
    pub message: Option<MessageRef>,
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),
    #[error("invalid button url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("transport error: {0}")]
    Other(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        format: TextFormat,
        keyboard: Option<Keyboard>,
    ) -> TransportResult<MessageRef>;

    async fn edit(
        &self,
        message: MessageRef,
        text: &str,
        format: TextFormat,
        keyboard: Option<Keyboard>,
    ) -> TransportResult<()>;

    async fn acknowledge(&self, callback_id: &str) -> TransportResult<bool>;

    /// every callback event whose data starts with `prefix` is passed to `handler`
    fn register_route(&self, prefix: &str, handler: CallbackHandler) -> RouteHandle;
}
