//! Per-update handlers: start/help command, voice message, text message.
//!
//! Each handler sends a status message first, then edits it in place with
//! the result (or the split notice). Faults are caught at the handler
//! boundary and reported to the user as plain error messages.

use std::sync::Arc;

use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use teloxide::utils::command::BotCommands;
use teloxide::RequestError;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::bot::reply::{greeting, part_message, summary_reply, texts, transcription_reply, Reply};
use crate::bot::summary::SummaryClient;
use crate::bot::whisper::Whisper;

/// Dependencies shared by all handlers, constructed once before dispatch.
pub struct AppState {
    pub whisper: Whisper,
    pub summary: SummaryClient,
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "приветствие и справка")]
    Start,
    #[command(description = "приветствие и справка")]
    Help,
}

pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    match cmd {
        Command::Start | Command::Help => {
            let user_name = msg.from.as_ref().map(|u| u.first_name.as_str()).unwrap_or("");
            bot.send_message(msg.chat.id, greeting(user_name, state.whisper.device()))
                .parse_mode(ParseMode::Markdown)
                .await?;
        }
    }
    Ok(())
}

pub async fn handle_voice(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    info!("Voice message in chat {}", msg.chat.id);

    let status = bot
        .send_message(msg.chat.id, texts::VOICE_STATUS)
        .parse_mode(ParseMode::Markdown)
        .await?;

    let result = match transcribe_voice(&bot, &msg, &state).await {
        Ok(text) => send_reply(&bot, msg.chat.id, status.id, transcription_reply(&text))
            .await
            .map_err(|e| format!("Failed to send transcription: {e}")),
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        warn!("Voice handler failed: {e}");
        bot.send_message(msg.chat.id, format!("{}{e}", texts::VOICE_ERROR_PREFIX))
            .parse_mode(ParseMode::Markdown)
            .await?;
    }

    Ok(())
}

pub async fn handle_text(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    info!("Text message in chat {} ({} chars)", msg.chat.id, text.chars().count());

    let status = bot
        .send_message(msg.chat.id, texts::TEXT_STATUS)
        .parse_mode(ParseMode::Markdown)
        .await?;

    // summarize() never fails; only delivery can.
    let summary = state.summary.summarize(text).await;
    let reply = summary_reply(&summary.into_text());

    if let Err(e) = send_reply(&bot, msg.chat.id, status.id, reply).await {
        warn!("Text handler failed: {e}");
        bot.send_message(msg.chat.id, format!("{}{e}", texts::TEXT_ERROR_PREFIX))
            .parse_mode(ParseMode::Markdown)
            .await?;
    }

    Ok(())
}

/// Download the voice note into a temp file and transcribe it.
///
/// The temp file is owned by the guard and removed when this function
/// returns, whether transcription succeeded or failed.
async fn transcribe_voice(bot: &Bot, msg: &Message, state: &AppState) -> Result<String, String> {
    let voice = msg.voice().ok_or("Message has no voice payload")?;

    let file = bot
        .get_file(voice.file.id.clone())
        .await
        .map_err(|e| format!("Failed to resolve voice file: {e}"))?;

    let temp = tempfile::Builder::new()
        .prefix("pereskaz_voice_")
        .suffix(".ogg")
        .tempfile()
        .map_err(|e| format!("Failed to create temp file: {e}"))?;

    let mut dst = tokio::fs::File::create(temp.path())
        .await
        .map_err(|e| format!("Failed to open temp file: {e}"))?;
    bot.download_file(&file.path, &mut dst)
        .await
        .map_err(|e| format!("Failed to download voice file: {e}"))?;
    dst.flush()
        .await
        .map_err(|e| format!("Failed to flush temp file: {e}"))?;
    drop(dst);

    // Whisper decode is blocking CPU work; keep it off the async workers.
    let whisper = state.whisper.clone();
    let audio_path = temp.path().to_path_buf();
    tokio::task::spawn_blocking(move || whisper.transcribe(&audio_path))
        .await
        .map_err(|e| format!("Transcription task failed: {e}"))?
}

/// Deliver a composed reply: edit the status message, then send numbered
/// parts if the result was split.
async fn send_reply(
    bot: &Bot,
    chat_id: ChatId,
    status_id: MessageId,
    reply: Reply,
) -> Result<(), RequestError> {
    match reply {
        Reply::Single(text) => {
            bot.edit_message_text(chat_id, status_id, text)
                .parse_mode(ParseMode::Markdown)
                .await?;
        }
        Reply::Parts { notice, chunks } => {
            bot.edit_message_text(chat_id, status_id, notice)
                .parse_mode(ParseMode::Markdown)
                .await?;
            for (index, chunk) in chunks.iter().enumerate() {
                bot.send_message(chat_id, part_message(index + 1, chunk))
                    .parse_mode(ParseMode::Markdown)
                    .await?;
            }
        }
    }
    Ok(())
}
