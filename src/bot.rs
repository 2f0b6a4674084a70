use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::moderation::{self, ChatEvent, ChatMessage, SenderChat, Verdict, VoiceNote};

const START_TEXT: &str = "Здесь ничего нет, совсем 🤨";

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "Say hello.")]
    Start,
    #[command(description = "Show sender and chat ids.")]
    Chat,
}

/// Run the bot until Ctrl-C
pub async fn run(bot: Bot, config: Arc<Config>) {
    info!("Listening to chat {}...", config.telegram.chat_handle());

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![config])
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("sentinel"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn schema() -> UpdateHandler<teloxide::RequestError> {
    let commands = dptree::entry()
        .filter_command::<Command>()
        .endpoint(handle_command);

    let chat_messages = dptree::filter(in_monitored_chat).endpoint(handle_chat_message);

    let channel_posts = Update::filter_channel_post()
        .filter(in_monitored_chat)
        .endpoint(handle_channel_post);

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(commands)
                .branch(chat_messages),
        )
        .branch(channel_posts)
}

fn in_monitored_chat(msg: Message, config: Arc<Config>) -> bool {
    msg.chat
        .username()
        .is_some_and(|name| config.telegram.chat_matches(name))
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> ResponseResult<()> {
    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, START_TEXT).await?;
        }
        Command::Chat => {
            let user_id = msg.from.as_ref().map(|user| user.id.0);
            bot.send_message(msg.chat.id, chat_info(user_id, msg.chat.id.0))
                .await?;
        }
    }
    Ok(())
}

async fn handle_chat_message(bot: Bot, msg: Message) -> ResponseResult<()> {
    moderate(&bot, &msg, chat_event(&msg)).await;
    Ok(())
}

async fn handle_channel_post(bot: Bot, post: Message) -> ResponseResult<()> {
    let event = ChatEvent::ChannelPost {
        message_id: post.id.0,
    };
    moderate(&bot, &post, event).await;
    Ok(())
}

/// Apply the verdict for `event`. Deletion failures are logged, never returned.
async fn moderate(bot: &Bot, msg: &Message, event: ChatEvent) {
    let verdict = moderation::admit(&event);
    let message_id = event.message_id();

    if verdict.deletes() {
        info!("Received new {}, it's ID: {}, deleting", verdict, message_id);
        if let ChatEvent::Message(message) = &event {
            if let Some(voice) = message.voice {
                debug!("Voice message {} is {} bytes", message_id, voice.file_size);
            }
            if let Some(sender) = message.sender_chat {
                debug!("Message {} was sent as chat {}", message_id, sender.chat_id);
            }
        }
        if let Err(e) = bot.delete_message(msg.chat.id, msg.id).await {
            error!("Failed to delete message {}: {}", message_id, e);
        }
        return;
    }

    if verdict == Verdict::Skip {
        info!(
            "Received an update from chat (ID: {}), but it's not a chat message, skipping",
            message_id
        );
    } else {
        debug!("Message {} allowed", message_id);
    }
}

/// Decode a teloxide message into the moderation model.
fn chat_event(msg: &Message) -> ChatEvent {
    let mut message = ChatMessage::new(msg.id.0);
    if let Some(voice) = msg.voice() {
        message = message.with_voice(VoiceNote {
            file_size: voice.file.size,
        });
    }
    if let Some(chat) = &msg.sender_chat {
        message = message.with_sender_chat(SenderChat { chat_id: chat.id.0 });
    }
    ChatEvent::Message(message)
}

fn chat_info(user_id: Option<u64>, chat_id: i64) -> String {
    match user_id {
        Some(id) => format!("user_id = {}, chat_id = {}", id, chat_id),
        None => format!("user_id = unknown, chat_id = {}", chat_id),
    }
}
