use ccbot_core::embeddings::Embedder;
use ccbot_core::llm::Generator;
use ccbot_core::{Error, Result};
use ccbot_index::{Retriever, SearchHit};
use serde::Serialize;
use tracing::info;

use crate::answer::AnswerGenerator;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    /// Chunks given to the model, closest first
    pub sources: Vec<SearchHit>,
}

/// Retrieve then generate
pub struct QueryPipeline<E, G> {
    retriever: Retriever<E>,
    answerer: AnswerGenerator<G>,
}

/// Pipeline over runtime-selected providers
pub type DynPipeline = QueryPipeline<Box<dyn Embedder>, Box<dyn Generator>>;

impl<E: Embedder, G: Generator> QueryPipeline<E, G> {
    pub fn new(retriever: Retriever<E>, answerer: AnswerGenerator<G>) -> Self {
        Self {
            retriever,
            answerer,
        }
    }

    pub fn retriever(&self) -> &Retriever<E> {
        &self.retriever
    }

    /// k used when the caller passes none
    pub fn default_k(&self) -> usize {
        self.answerer.profile().top_k
    }

    pub fn ask(&self, question: &str, k: Option<usize>) -> Result<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::EmptyQuery);
        }

        let k = k.unwrap_or_else(|| self.default_k());
        let sources = self.retriever.search(question, k)?;
        let text = self.answerer.generate(question, &sources)?;
        info!("answered with {} sources (k={})", sources.len(), k);

        Ok(Answer { text, sources })
    }
}
