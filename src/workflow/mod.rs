pub mod chain_ctx;
pub mod quiz_step;

pub use chain_ctx::ChainCtx;
pub use quiz_step::{Collaborators, QuizStep, StepResult};
