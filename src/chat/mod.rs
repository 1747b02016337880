pub mod faq;
pub mod history;
pub mod pipeline;
pub mod prompt;

pub use faq::FaqTable;
pub use history::{sanitize_history, ChatTurn, RawTurn, Role};
pub use pipeline::{AnswerOutcome, AnswerPipeline, AnswerSource};
