pub mod answer_generator;
pub mod content_fetcher;
pub mod directive_parser;

pub use answer_generator::AnswerGenerator;
pub use content_fetcher::{ContentFetcher, PageFetcher};
pub use directive_parser::parse_submission_target;
