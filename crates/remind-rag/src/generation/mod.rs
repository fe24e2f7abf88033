//! Grounded answer generation

mod composer;
mod prompt;

pub use composer::{AnswerComposer, GENERATION_FAILED_MESSAGE, NO_DOCUMENTS_MESSAGE};
pub use prompt::PromptBuilder;
