use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kintai_core::AttendanceRecord;

use crate::extract::Extractor;
use crate::quality::{self, TextQuality};
use crate::recognizer::{OcrBackend, OcrError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// The result of a single timecard scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Raw OCR transcript, kept for reviewer display next to the record.
    pub ocr_text: String,
    /// The engine's overall recognition confidence (0.0–1.0).
    pub confidence: f32,
    /// Structured fields plus the reconstructed transcript.
    pub record: AttendanceRecord,
    /// Advisory transcript quality score, independent of extraction.
    pub quality: TextQuality,
    pub processed_at: DateTime<Utc>,
}

/// Orchestrates: recognize → extract → score.
///
/// Past the recognizer there is no I/O, no shared state, and nothing to
/// cancel, so each call is safe to run concurrently with any other.
pub struct TimecardPipeline<R: OcrBackend> {
    recognizer: R,
}

impl<R: OcrBackend> TimecardPipeline<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    /// Process raw image bytes (from upload or camera capture).
    pub fn process_image(&self, image_bytes: &[u8]) -> Result<ScanOutcome, PipelineError> {
        let recognized = self.recognizer.recognize(image_bytes)?;
        tracing::info!(
            "recognized {} chars, confidence {:.2}",
            recognized.text.chars().count(),
            recognized.confidence
        );

        let record = Extractor::extract(&recognized.text);
        let quality = quality::evaluate(&recognized.text);

        Ok(ScanOutcome {
            ocr_text: recognized.text,
            confidence: recognized.confidence,
            record,
            quality,
            processed_at: Utc::now(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::{MockRecognizer, RecognizedText};

    const SAMPLE_SHEET: &str = "タイムカード\n社員番号: 123456\n氏名: 山田太郎\n部署: 営業部\n勤務日: 2024-06-24\n出勤 09:00\n退勤 18:00\n休憩時間: 60分\n備考: 通常勤務";

    #[test]
    fn process_image_extracts_structured_record() {
        let pipeline = TimecardPipeline::new(MockRecognizer::new(SAMPLE_SHEET));
        let outcome = pipeline.process_image(b"fake image").unwrap();

        assert_eq!(outcome.confidence, 0.85);
        assert_eq!(outcome.record.employee_id, "123456");
        assert_eq!(outcome.record.employee_name, "山田太郎");
        assert_eq!(outcome.record.department, "営業部");
        assert_eq!(outcome.record.work_date, "2024-06-24");
        assert_eq!(outcome.record.start_time, "09:00");
        assert_eq!(outcome.record.end_time, "18:00");
        assert_eq!(outcome.record.break_time, "60");
        assert_eq!(outcome.record.remarks, "通常勤務");
        assert!(outcome.record.is_usable());
    }

    #[test]
    fn quality_is_scored_alongside_extraction() {
        let pipeline = TimecardPipeline::new(MockRecognizer::new(SAMPLE_SHEET));
        let outcome = pipeline.process_image(b"fake image").unwrap();
        assert_eq!(outcome.quality.score, 100);
    }

    #[test]
    fn empty_transcript_still_produces_outcome() {
        let pipeline = TimecardPipeline::new(MockRecognizer::with_confidence("", 0.0));
        let outcome = pipeline.process_image(b"fake image").unwrap();
        assert_eq!(outcome.record, AttendanceRecord::default());
        assert!(!outcome.record.is_usable());
        assert_eq!(outcome.quality.score, 0);
    }

    struct FailingBackend;

    impl OcrBackend for FailingBackend {
        fn recognize(&self, _image_bytes: &[u8]) -> Result<RecognizedText, OcrError> {
            Err(OcrError::Engine("quota exceeded".to_string()))
        }
    }

    #[test]
    fn recognizer_failure_surfaces_as_pipeline_error() {
        let pipeline = TimecardPipeline::new(FailingBackend);
        let err = pipeline.process_image(b"fake image").unwrap_err();
        assert!(matches!(err, PipelineError::Ocr(OcrError::Engine(_))));
    }

    #[test]
    fn outcome_serializes_to_json() {
        let pipeline = TimecardPipeline::new(MockRecognizer::new(SAMPLE_SHEET));
        let outcome = pipeline.process_image(b"fake image").unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["record"]["employeeName"], "山田太郎");
        assert_eq!(json["quality"]["score"], 100);
    }
}
