//! Integration tests for voice transcription.
//!
//! These tests require:
//! 1. A Whisper model file (ggml-base.bin recommended for tests)
//! 2. ffmpeg installed for audio conversion
//!
//! Run with: cargo test --features integ_test --test voice_transcription

#[cfg(feature = "integ_test")]
mod tests {
    use std::path::PathBuf;

    use pereskaz::bot::reply::{transcription_reply, Reply};
    use pereskaz::bot::Whisper;

    /// Path to test Whisper model (set via env var or default location)
    fn get_test_model_path() -> PathBuf {
        std::env::var("WHISPER_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/test/ggml-base.bin"))
    }

    /// Path to test audio files
    fn get_test_audio_dir() -> PathBuf {
        PathBuf::from("data/test/audio")
    }

    /// Test that Whisper loads successfully.
    #[test]
    fn test_whisper_loads() {
        let model_path = get_test_model_path();
        if !model_path.exists() {
            eprintln!("Skipping test: model not found at {:?}", model_path);
            eprintln!("Download from: https://huggingface.co/ggerganov/whisper.cpp/tree/main");
            return;
        }

        let whisper = Whisper::new(&model_path);
        assert!(whisper.is_ok(), "Failed to load Whisper: {:?}", whisper.err());
    }

    /// Test transcription of a simple audio file.
    ///
    /// This test requires a test audio file at data/test/audio/hello.ogg
    /// containing someone saying "hello" or similar.
    #[test]
    fn test_transcribe_hello() {
        let model_path = get_test_model_path();
        if !model_path.exists() {
            eprintln!("Skipping test: model not found");
            return;
        }

        let audio_path = get_test_audio_dir().join("hello.ogg");
        if !audio_path.exists() {
            eprintln!("Skipping test: test audio not found at {:?}", audio_path);
            eprintln!("Create a short voice recording saying 'hello' and save as hello.ogg");
            return;
        }

        let whisper = Whisper::new(&model_path).expect("Failed to load model");

        let result = whisper.transcribe(&audio_path);
        assert!(result.is_ok(), "Transcription failed: {:?}", result.err());

        let text = result.unwrap().to_lowercase();
        println!("Transcribed: {}", text);

        // Should contain "hello" or similar
        assert!(
            text.contains("hello") || text.contains("hi") || text.contains("hey"),
            "Expected greeting in transcription, got: {}",
            text
        );
    }

    /// E2E test: transcribe a voice note and verify the composed reply.
    ///
    /// This is a black-box test that:
    /// 1. Loads a Whisper model
    /// 2. Transcribes a test audio file (simulating the downloaded temp file)
    /// 3. Composes the reply the handler would send
    #[test]
    fn test_e2e_voice_message_flow() {
        let model_path = get_test_model_path();
        if !model_path.exists() {
            eprintln!("Skipping E2E test: model not found at {:?}", model_path);
            return;
        }

        let audio_path = get_test_audio_dir().join("test_phrase.ogg");
        if !audio_path.exists() {
            eprintln!("Skipping E2E test: audio not found at {:?}", audio_path);
            eprintln!("Record a voice message with a known phrase and save as test_phrase.ogg");
            return;
        }

        // Step 1: Load Whisper (simulates bot startup)
        let whisper = Whisper::new(&model_path).expect("Failed to load Whisper model");

        // Step 2: Transcribe
        let transcription = whisper.transcribe(&audio_path).expect("Transcription failed");
        println!("E2E Transcription: {}", transcription);
        assert!(!transcription.is_empty(), "Transcription should not be empty");
        assert_eq!(transcription, transcription.trim(), "Transcription should be trimmed");

        // Step 3: Compose the reply the voice handler would send
        match transcription_reply(&transcription) {
            Reply::Single(text) => {
                assert!(text.starts_with("Транскрибация:\n"), "Missing transcription prefix");
                assert!(text.ends_with(&transcription), "Missing transcription content");
            }
            Reply::Parts { chunks, .. } => {
                assert_eq!(chunks.concat(), transcription, "Chunks should reproduce transcription");
            }
        }
    }
}
