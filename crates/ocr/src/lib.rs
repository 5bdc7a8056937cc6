pub mod extract;
pub mod lines;
pub mod normalize;
pub mod pipeline;
pub mod quality;
pub mod recognizer;
pub mod reformat;

pub use extract::Extractor;
pub use lines::candidate_lines;
pub use normalize::{normalize_date, normalize_time};
pub use pipeline::{PipelineError, ScanOutcome, TimecardPipeline};
pub use quality::TextQuality;
pub use recognizer::{
    aggregate_confidence, MockRecognizer, OcrBackend, OcrError, RecognizedText, TokenDetection,
};
pub use reformat::format_transcript;
