use ccbot_core::llm::{ChatMessage, Generator};
use ccbot_core::Result;
use ccbot_index::SearchHit;
use tracing::debug;

use crate::profile::PromptProfile;

/// Retrieved chunk texts, one per line, in retrieval order
pub fn build_context(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|h| h.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turns a question plus retrieved chunks into a model answer
pub struct AnswerGenerator<G> {
    generator: G,
    profile: PromptProfile,
}

impl<G: Generator> AnswerGenerator<G> {
    pub fn new(generator: G, profile: PromptProfile) -> Self {
        Self { generator, profile }
    }

    pub fn profile(&self) -> &PromptProfile {
        &self.profile
    }

    pub fn messages(&self, question: &str, hits: &[SearchHit]) -> Vec<ChatMessage> {
        let context = build_context(hits);
        vec![
            ChatMessage::system(self.profile.system.clone()),
            ChatMessage::user(self.profile.render_user(question, &context)),
        ]
    }

    /// The model's reply, verbatim
    pub fn generate(&self, question: &str, hits: &[SearchHit]) -> Result<String> {
        let messages = self.messages(question, hits);
        debug!(
            "asking {} with {} context chunks",
            self.generator.model_id(),
            hits.len()
        );
        self.generator.generate(&messages)
    }
}
