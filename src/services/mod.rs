pub mod llm_service;
pub mod record_builder;
pub mod segmenter;

pub use llm_service::{Grader, LlmService};
pub use record_builder::{build_records, structure_texts};
pub use segmenter::{segment, Segmenter};
