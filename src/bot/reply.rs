//! Reply composition: turns a result string into the outgoing response
//! sequence, splitting over-length results into numbered parts.
//!
//! Everything here is pure so the observable message flow can be tested
//! without a live bot.

/// Maximum characters per outgoing part.
pub const PART_LIMIT: usize = 4000;
/// Transcriptions longer than this are split into parts.
///
/// Intentionally lower than [`PART_LIMIT`]; long transcriptions switch to
/// multi-part delivery before they hit the hard message ceiling.
pub const VOICE_SPLIT_THRESHOLD: usize = 3000;
/// Summaries longer than this are split into parts.
pub const TEXT_SPLIT_THRESHOLD: usize = 4000;

/// User-facing message texts.
pub mod texts {
    pub const VOICE_STATUS: &str = "Обрабатываю голосовое...";
    pub const TEXT_STATUS: &str = "Генерирую краткое резюме...";
    pub const TRANSCRIPT_PREFIX: &str = "Транскрибация:\n";
    pub const TRANSCRIPT_SPLIT_NOTICE: &str = "Транскрибация (разбита на части)";
    pub const SUMMARY_PREFIX: &str = "Краткое резюме:\n";
    pub const SUMMARY_SPLIT_NOTICE: &str = "Результат слишком большой, отправляю частями:";
    pub const EMPTY_SUMMARY: &str = "Ошибка: пустой ответ от g4f.";
    pub const SUMMARY_FAILED_PREFIX: &str = "Не удалось получить ответ от g4f: ";
    pub const VOICE_ERROR_PREFIX: &str = "Произошла ошибка: ";
    pub const TEXT_ERROR_PREFIX: &str = "Ошибка при генерации: ";
}

/// The full observable response to one update.
#[derive(Debug, PartialEq)]
pub enum Reply {
    /// Edit the status message in place to this text.
    Single(String),
    /// Edit the status message to `notice`, then send one message per chunk,
    /// numbered from 1.
    Parts { notice: String, chunks: Vec<String> },
}

/// Compose the reply for a finished transcription.
pub fn transcription_reply(text: &str) -> Reply {
    if text.chars().count() > VOICE_SPLIT_THRESHOLD {
        Reply::Parts {
            notice: texts::TRANSCRIPT_SPLIT_NOTICE.to_string(),
            chunks: split_text(text, PART_LIMIT),
        }
    } else {
        Reply::Single(format!("{}{text}", texts::TRANSCRIPT_PREFIX))
    }
}

/// Compose the reply for a finished summary.
pub fn summary_reply(text: &str) -> Reply {
    if text.chars().count() > TEXT_SPLIT_THRESHOLD {
        Reply::Parts {
            notice: texts::SUMMARY_SPLIT_NOTICE.to_string(),
            chunks: split_text(text, PART_LIMIT),
        }
    } else {
        Reply::Single(format!("{}{text}", texts::SUMMARY_PREFIX))
    }
}

/// Format one numbered part message. Parts are numbered from 1.
pub fn part_message(index: usize, chunk: &str) -> String {
    format!("Часть {index}:\n{chunk}")
}

/// Greeting sent in response to /start and /help.
pub fn greeting(user_name: &str, device: &str) -> String {
    format!(
        "Привет, {user_name}!\n\
         Я бот, который умеет:\n\
         1. Принимать голосовые сообщения (ogg)\n\
         2. Транскрибировать их (Whisper)\n\
         3. С помощью g4f (ChatGPT) – генерировать краткое резюме.\n\n\
         Отправьте голосовое или текст, а я верну ответ.\n\n\
         (Whisper работает на {device})\n\
         Бот доступен для всех пользователей!"
    )
}

/// Split `text` into consecutive chunks of at most `chunk_size` characters.
///
/// Operates on characters, not bytes, so multi-byte input never splits a
/// code point.
fn split_text(text: &str, chunk_size: usize) -> Vec<String> {
    text.chars()
        .collect::<Vec<_>>()
        .chunks(chunk_size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
