pub mod alignment;
pub mod config;
pub mod emotion;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod types;

pub use alignment::report::{summarize, GlobalMetrics, InterviewReport};
pub use alignment::validation::{
    load_manual_labels, parse_manual_labels, validate_report, ManualLabel, SegmentComparison,
    ValidationStatus, ValidationSummary,
};
pub use alignment::window::{aggregate, FaceTimeline, RecencyWeights};
pub use config::{FirstSegmentPolicy, InsightStyle, SyncConfig, WindowPolicy};
pub use emotion::{Emotion, Valence};
pub use error::CongruenceError;
pub use ingest::{
    interview_id_for, load_face_series, load_segments, parse_face_series, parse_segments,
    video_id_from_interview,
};
pub use pipeline::builder::SynchronizerBuilder;
pub use pipeline::runtime::Synchronizer;
pub use pipeline::traits::{CongruenceScorer, StateSmoother, WindowAggregator};
pub use types::{CongruenceEvent, FaceObservation, SpeechSegment, WindowAggregate};
