//! Speech-to-text transcription using whisper-rs.
//!
//! Converts voice notes (OGG Opus from Telegram) to text.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Whisper transcription engine.
///
/// Cheap to clone; the underlying model context is shared.
#[derive(Clone)]
pub struct Whisper {
    ctx: Arc<WhisperContext>,
    device: &'static str,
}

impl Whisper {
    /// Load a Whisper model from a .bin file.
    pub fn new(model_path: &Path) -> Result<Self, String> {
        info!("Loading Whisper model from {:?}", model_path);

        if !model_path.exists() {
            return Err(format!("Model file not found: {:?}", model_path));
        }

        let ctx = WhisperContext::new_with_params(
            model_path.to_str().ok_or("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| format!("Failed to load Whisper model: {e}"))?;

        let device = if cfg!(feature = "cuda") { "cuda" } else { "cpu" };
        info!("Whisper model loaded successfully ({device})");
        Ok(Self { ctx: Arc::new(ctx), device })
    }

    /// Compute device the model runs on, bound once at load time.
    pub fn device(&self) -> &'static str {
        self.device
    }

    /// Transcribe an audio file (OGG Opus voice note).
    ///
    /// Converts to 16KHz mono PCM using ffmpeg, then runs Whisper with
    /// automatic language detection. Blocking; run on a blocking thread
    /// from async contexts.
    pub fn transcribe(&self, audio_path: &Path) -> Result<String, String> {
        debug!("Transcribing {:?}", audio_path);

        // Convert OGG to 16KHz mono f32 PCM using ffmpeg
        let pcm_data = convert_ogg_to_pcm(audio_path)?;

        // Create state for this transcription
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| format!("Failed to create Whisper state: {e}"))?;

        // Configure parameters
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some("auto"));
        params.set_translate(false);
        params.set_no_timestamps(true);
        params.set_single_segment(false);

        // Run transcription
        state
            .full(params, &pcm_data)
            .map_err(|e| format!("Whisper transcription failed: {e}"))?;

        // Collect all segments
        let mut text = String::new();
        for segment in state.as_iter() {
            if let Ok(s) = segment.to_str() {
                text.push_str(s);
                text.push(' ');
            }
        }

        let text = text.trim().to_string();
        info!("Transcribed: \"{}\"", truncate(&text, 100));
        Ok(text)
    }
}

/// Convert an OGG Opus file to 16KHz mono f32 PCM samples using ffmpeg.
fn convert_ogg_to_pcm(audio_path: &Path) -> Result<Vec<f32>, String> {
    let input = audio_path
        .to_str()
        .ok_or_else(|| format!("Invalid audio path: {:?}", audio_path))?;

    // Output format: 16-bit signed little-endian, 16KHz, mono
    let output = Command::new("ffmpeg")
        .args([
            "-i",
            input,
            "-ar",
            "16000", // 16KHz sample rate
            "-ac",
            "1", // Mono
            "-f",
            "s16le", // 16-bit signed little-endian PCM
            "-acodec",
            "pcm_s16le",
            "-y",     // Overwrite
            "pipe:1", // Output to stdout
        ])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .output()
        .map_err(|e| format!("Failed to run ffmpeg: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("ffmpeg failed: {}", stderr));
    }

    // Convert i16 samples to f32
    let samples: Vec<f32> = output
        .stdout
        .chunks_exact(2)
        .map(|chunk| {
            let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
            sample as f32 / 32768.0
        })
        .collect();

    debug!("Converted to {} f32 samples", samples.len());
    Ok(samples)
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max])
    }
}
