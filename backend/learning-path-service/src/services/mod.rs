pub mod assembly;
pub mod enhancer;
pub mod fetch;
pub mod pipeline;
pub mod query;
pub mod ranking;
pub mod store;

pub use assembly::{PathAssembler, StepArchetype, STEP_COUNT};
pub use enhancer::{EnhancerError, PathEnhancer};
pub use fetch::{
    filter_by_content_type, ContentStats, FetchOrchestrator, FetchOutcome, SourceClient,
    SourceError, SourceReport, SourceStatus,
};
pub use pipeline::{GeneratedPath, GenerationReport, PathGenerator, StoredPath};
pub use query::QueryGenerator;
pub use ranking::{diversify, filter_by_quality, RankingEngine, RankingExplanation, RankingWeights};
pub use store::{InMemoryPathStore, PathStore, StoreError};
