pub mod llm_client;
pub mod submission_client;

pub use llm_client::{OpenAiReasoningClient, ReasoningService, ResponseFormat};
pub use submission_client::{HttpSubmissionClient, SubmissionService};
