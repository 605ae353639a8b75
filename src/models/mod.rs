pub mod chain;

pub use chain::{
    Answer, ChainOutcome, ChainReport, ChainRequest, SubmissionPayload, SubmissionVerdict,
};
