pub mod question;
pub mod submission;

pub use question::{
    GradedQuestion, GradingReport, QuestionNumber, QuestionRecord, SegmentedDocument, NO_ANSWER,
    NO_MARKING_SCHEME,
};
pub use submission::{
    BatchResult, DocumentPayload, SubmissionFailure, SubmissionResult, UploadedFile,
};
