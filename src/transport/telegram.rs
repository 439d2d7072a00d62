use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use teloxide::{
    dispatching::{dialogue::GetChatId, UpdateFilterExt},
    dptree::{self, Handler},
    prelude::*,
    types::{
        CallbackQuery, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode,
        Update,
    },
    Bot,
};

use super::{
    CallbackEvent, CallbackHandler, Keyboard, KeyboardButtonKind, MessageRef, RouteHandle,
    RouteTable, TextFormat, Transport, TransportResult,
};

pub type BotHandler<E> =
    Handler<'static, DependencyMap, Result<(), E>, teloxide::dispatching::DpHandlerDescription>;

/// [`Transport`] over telegram bot api.
///
/// Routes registered here are only served if [`routes_handler`] is a part of
/// dispatcher's handler tree and the transport is passed as a dependency.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
    routes: RouteTable,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            routes: RouteTable::new(),
        }
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}

#[allow(deprecated)]
pub fn parse_mode(format: TextFormat) -> ParseMode {
    match format {
        TextFormat::Markdown => ParseMode::Markdown,
        TextFormat::MarkdownV2 => ParseMode::MarkdownV2,
        TextFormat::Html => ParseMode::Html,
    }
}

pub fn inline_keyboard(keyboard: Keyboard) -> TransportResult<InlineKeyboardMarkup> {
    let inline_keyboard = keyboard
        .rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|b| match b.kind {
                    KeyboardButtonKind::Callback(data) => {
                        Ok(InlineKeyboardButton::callback(b.label, data))
                    }
                    KeyboardButtonKind::Url(url) => {
                        Ok(InlineKeyboardButton::url(b.label, url.parse()?))
                    }
                })
                .collect::<TransportResult<Vec<_>>>()
        })
        .collect::<TransportResult<Vec<_>>>()?;

    Ok(InlineKeyboardMarkup { inline_keyboard })
}

impl From<&CallbackQuery> for CallbackEvent {
    fn from(q: &CallbackQuery) -> Self {
        let chat_id = match q.chat_id() {
            Some(chat_id) => chat_id.0,
            None => q.from.id.0 as i64,
        };

        Self {
            id: q.id.to_string(),
            data: q.data.clone(),
            chat_id,
            user_id: q.from.id.0,
            message: q.message.as_ref().map(|m| MessageRef {
                chat_id,
                message_id: m.id().0,
            }),
        }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        format: TextFormat,
        keyboard: Option<Keyboard>,
    ) -> TransportResult<MessageRef> {
        let msg = self
            .bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(parse_mode(format));
        let msg = match keyboard {
            Some(kbd) => msg.reply_markup(inline_keyboard(kbd)?),
            None => msg,
        };
        let msg = msg.await?;

        Ok(MessageRef {
            chat_id: msg.chat.id.0,
            message_id: msg.id.0,
        })
    }

    async fn edit(
        &self,
        message: MessageRef,
        text: &str,
        format: TextFormat,
        keyboard: Option<Keyboard>,
    ) -> TransportResult<()> {
        let msg = self
            .bot
            .edit_message_text(
                ChatId(message.chat_id),
                MessageId(message.message_id),
                text,
            )
            .parse_mode(parse_mode(format));
        let msg = match keyboard {
            Some(kbd) => msg.reply_markup(inline_keyboard(kbd)?),
            None => msg,
        };
        msg.await?;

        Ok(())
    }

    async fn acknowledge(&self, callback_id: &str) -> TransportResult<bool> {
        self.bot
            .answer_callback_query(callback_id.to_string())
            .await?;

        Ok(true)
    }

    fn register_route(&self, prefix: &str, handler: CallbackHandler) -> RouteHandle {
        self.routes.register(prefix, handler)
    }
}

/// Serves callback queries matching a registered route, others fall through.
/// Never fails, `E` is the error type of the rest of the handler tree.
pub fn routes_handler<E>() -> BotHandler<E>
where
    E: Send + Sync + 'static,
{
    dptree::entry().branch(
        Update::filter_callback_query()
            .filter_map(|q: CallbackQuery, transport: TelegramTransport| {
                q.data
                    .as_deref()
                    .and_then(|data| transport.routes().find(data))
            })
            .endpoint(handle_route::<E>),
    )
}

async fn handle_route<E>(
    transport: TelegramTransport,
    handler: CallbackHandler,
    q: CallbackQuery,
) -> Result<(), E> {
    info!("Routing callback query {} from user {}", q.id, q.from.id);
    let event = CallbackEvent::from(&q);
    debug!("Callback event: {event:?}");

    let transport: Arc<dyn Transport> = Arc::new(transport);
    handler(transport, event).await;

    Ok(())
}
