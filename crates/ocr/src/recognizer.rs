use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
}

/// The full-page transcript an OCR engine hands us, with its overall
/// confidence (0.0–1.0). The extraction core depends only on `text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizedText {
    pub text: String,
    pub confidence: f32,
}

/// Abstraction over an upstream OCR engine.
/// Implementations accept raw PNG/JPEG image bytes and return the recognized
/// full-page transcript. This crate ships no real backend; the host
/// application owns that integration.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<RecognizedText, OcrError>;
}

/// One recognized token, as reported by engines that score per word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDetection {
    pub text: String,
    pub confidence: Option<f32>,
}

/// Collapse per-token scores into one page confidence: the mean of the tokens
/// that carry a score, 0.7 when none of them do, 0.5 with no tokens at all.
pub fn aggregate_confidence(tokens: &[TokenDetection]) -> f32 {
    if tokens.is_empty() {
        return 0.5;
    }
    let (sum, scored) = tokens
        .iter()
        .filter_map(|t| t.confidence)
        .fold((0.0f32, 0u32), |(sum, n), c| (sum + c, n + 1));
    if scored == 0 {
        0.7
    } else {
        sum / scored as f32
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set transcript, useful for exercising the extraction
/// pipeline without any OCR engine installed.
pub struct MockRecognizer {
    pub text: String,
    pub confidence: f32,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), confidence: 0.85 }
    }

    pub fn with_confidence(text: impl Into<String>, confidence: f32) -> Self {
        Self { text: text.into(), confidence }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<RecognizedText, OcrError> {
        Ok(RecognizedText { text: self.text.clone(), confidence: self.confidence })
    }
}
