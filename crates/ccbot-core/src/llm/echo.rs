use super::{ChatMessage, Generator, Role};
use crate::error::Result;

/// Offline generator that answers with the last user message
#[derive(Debug, Default, Clone)]
pub struct EchoGenerator;

impl Generator for EchoGenerator {
    fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        Ok(messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default())
    }

    fn model_id(&self) -> &str {
        "echo"
    }
}
