use std::sync::Arc;

use teloxide::dispatching::MessageFilterExt;
use teloxide::prelude::*;
use tracing::info;

use pereskaz::bot::{handlers, AppState, Command, SummaryClient, Whisper};
use pereskaz::config::Config;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    let whisper = match Whisper::new(&config.whisper_model_path) {
        Ok(whisper) => whisper,
        Err(e) => {
            tracing::error!("Failed to load Whisper model: {e}");
            std::process::exit(1);
        }
    };

    let summary = SummaryClient::new(&config);
    let bot = Bot::new(&config.telegram_bot_token);
    let state = Arc::new(AppState { whisper, summary });

    // Commands first so /start is not summarized as plain text.
    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handlers::handle_command),
        )
        .branch(Message::filter_voice().endpoint(handlers::handle_voice))
        .branch(Message::filter_text().endpoint(handlers::handle_text));

    info!("Starting pereskaz...");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
