//! Bot module - relays Telegram voice notes to Whisper and texts to a
//! chat-completion backend.

pub mod handlers;
pub mod reply;
pub mod summary;
pub mod whisper;

pub use handlers::{AppState, Command};
pub use summary::{Summary, SummaryClient};
pub use whisper::Whisper;
