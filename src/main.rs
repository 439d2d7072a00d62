use std::sync::Arc;

use envconfig::Envconfig;
use log::{error, info};
use teloxide::{prelude::*, utils::command::BotCommands};

use tgdialog::{
    config::{Actions, DialogConfig},
    transport::{
        callback_handler,
        telegram::{routes_handler, TelegramTransport},
        CallbackEvent, TextFormat, Transport,
    },
    Dialog, DialogError,
};

#[derive(Envconfig, Clone)]
pub struct Config {
    #[envconfig(from = "BOT_TOKEN")]
    pub bot_token: String,
    #[envconfig(from = "DIALOG_PATH", default = "dialog.json")]
    pub dialog_path: String,
    #[envconfig(from = "START_NODE", default = "start")]
    pub start_node: String,
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
enum UserCommands {
    /// Opens the menu
    Start,
    /// Shows this message.
    Help,
}

/// id of node shown on /start
#[derive(Clone)]
struct StartNode(String);

#[derive(thiserror::Error, Debug)]
pub enum BotError {
    #[error("dialog error: {0}")]
    DialogError(#[from] DialogError),
    #[error("telegram error: {0}")]
    TeloxideError(#[from] teloxide::RequestError),
}

pub type BotResult<T> = Result<T, BotError>;

fn actions() -> Actions {
    let mut actions = Actions::new();
    actions.insert("ping".to_string(), callback_handler(ping));

    actions
}

async fn ping(transport: Arc<dyn Transport>, event: CallbackEvent) {
    info!("Ping from user {}", event.user_id);
    if let Err(err) = transport
        .send(event.chat_id, "pong", TextFormat::Markdown, None)
        .await
    {
        error!("Failed to answer ping, err: {err}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // variables may come from the environment only
    dotenvy::dotenv().ok();
    pretty_env_logger::init();
    let config = Config::init_from_env()?;

    let dialog = DialogConfig::from_file(&config.dialog_path)?.build(&actions())?;
    let dialog = Arc::new(dialog);
    info!("Loaded {dialog:?}");

    let bot = Bot::new(&config.bot_token);
    let transport = TelegramTransport::new(bot.clone());

    let handler = dptree::entry()
        .inspect(|u: Update| {
            log::debug!("{u:#?}");
        })
        .branch(routes_handler::<BotError>())
        .branch(
            Update::filter_message()
                .filter_command::<UserCommands>()
                .endpoint(user_command_handler),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![
            transport,
            dialog,
            StartNode(config.start_node)
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn user_command_handler(
    bot: Bot,
    transport: TelegramTransport,
    dialog: Arc<Dialog>,
    start: StartNode,
    msg: Message,
    cmd: UserCommands,
) -> BotResult<()> {
    match cmd {
        UserCommands::Start => {
            let sent = dialog.show(Arc::new(transport), msg.chat.id.0, &start.0).await?;
            info!("Started dialog in chat {}, message {}", sent.chat_id, sent.message_id);
        }
        UserCommands::Help => {
            bot.send_message(msg.chat.id, UserCommands::descriptions().to_string())
                .await?;
        }
    }

    Ok(())
}
