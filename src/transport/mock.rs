#![allow(clippy::unwrap_used)]

use std::sync::{
    atomic::{AtomicBool, AtomicI32, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;

use super::{
    CallbackEvent, CallbackHandler, Keyboard, MessageRef, RouteHandle, RouteTable, TextFormat,
    Transport, TransportError, TransportResult,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub message: MessageRef,
    pub text: String,
    pub format: TextFormat,
    pub keyboard: Option<Keyboard>,
}

/// Records every call instead of talking to telegram
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<Rendered>>,
    pub edited: Mutex<Vec<Rendered>>,
    pub acknowledged: Mutex<Vec<String>>,
    pub routes: RouteTable,
    pub fail_acknowledge: AtomicBool,
    pub fail_render: AtomicBool,
    next_message_id: AtomicI32,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Default::default())
    }

    pub fn sent(&self) -> Vec<Rendered> {
        self.sent.lock().unwrap().clone()
    }

    pub fn edited(&self) -> Vec<Rendered> {
        self.edited.lock().unwrap().clone()
    }

    pub fn acknowledged(&self) -> Vec<String> {
        self.acknowledged.lock().unwrap().clone()
    }

    /// callback event as if user pressed button with `data` on `message`
    pub fn event(id: &str, data: &str, message: MessageRef) -> CallbackEvent {
        CallbackEvent {
            id: id.to_string(),
            data: Some(data.to_string()),
            chat_id: message.chat_id,
            user_id: 42,
            message: Some(message),
        }
    }

    /// delivers event to the first matching route, returns false if nothing matched
    pub async fn tap(self: &Arc<Self>, event: CallbackEvent) -> bool {
        let handler = match event.data.as_deref().and_then(|d| self.routes.find(d)) {
            Some(handler) => handler,
            None => return false,
        };
        let transport: Arc<dyn Transport> = self.clone();
        handler(transport, event).await;

        true
    }

    fn render(
        &self,
        chat_id: i64,
        text: &str,
        format: TextFormat,
        keyboard: Option<Keyboard>,
    ) -> TransportResult<Rendered> {
        if self.fail_render.load(Ordering::SeqCst) {
            return Err(TransportError::Other("render failed".to_string()));
        }

        Ok(Rendered {
            message: MessageRef {
                chat_id,
                message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1,
            },
            text: text.to_string(),
            format,
            keyboard,
        })
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        format: TextFormat,
        keyboard: Option<Keyboard>,
    ) -> TransportResult<MessageRef> {
        let rendered = self.render(chat_id, text, format, keyboard)?;
        let message = rendered.message;
        self.sent.lock().unwrap().push(rendered);

        Ok(message)
    }

    async fn edit(
        &self,
        message: MessageRef,
        text: &str,
        format: TextFormat,
        keyboard: Option<Keyboard>,
    ) -> TransportResult<()> {
        let rendered = self.render(message.chat_id, text, format, keyboard)?;
        self.edited.lock().unwrap().push(Rendered {
            message,
            ..rendered
        });

        Ok(())
    }

    async fn acknowledge(&self, callback_id: &str) -> TransportResult<bool> {
        self.acknowledged
            .lock()
            .unwrap()
            .push(callback_id.to_string());
        if self.fail_acknowledge.load(Ordering::SeqCst) {
            return Err(TransportError::Other("acknowledge failed".to_string()));
        }

        Ok(true)
    }

    fn register_route(&self, prefix: &str, handler: CallbackHandler) -> RouteHandle {
        self.routes.register(prefix, handler)
    }
}
