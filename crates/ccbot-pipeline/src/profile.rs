//! Prompt profiles: system instruction, user-message layout and default k

use ccbot_config::{ProfileName, RetrievalConfig};

const STANDARD_SYSTEM: &str =
    "You are a helpful assistant answering questions about vaccination data.";
const LEGACY_SYSTEM: &str =
    "You are a helpful assistant answering questions about Contra Costa County COVID-19 data.";

/// Where the question sits relative to the retrieved context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptLayout {
    /// `Context:\n{context}\n\nQuestion: {question}`
    ContextFirst,
    /// `Question: {question}\n\nContext:\n{context}`
    QuestionFirst,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptProfile {
    pub name: ProfileName,
    pub system: String,
    pub layout: PromptLayout,
    pub top_k: usize,
}

impl PromptProfile {
    pub fn standard() -> Self {
        Self {
            name: ProfileName::Standard,
            system: STANDARD_SYSTEM.to_string(),
            layout: PromptLayout::ContextFirst,
            top_k: 5,
        }
    }

    pub fn legacy() -> Self {
        Self {
            name: ProfileName::Legacy,
            system: LEGACY_SYSTEM.to_string(),
            layout: PromptLayout::QuestionFirst,
            top_k: 3,
        }
    }

    pub fn named(name: ProfileName) -> Self {
        match name {
            ProfileName::Standard => Self::standard(),
            ProfileName::Legacy => Self::legacy(),
        }
    }

    /// The configured profile with `top_k` and `system_prompt` overrides applied
    pub fn from_config(config: &RetrievalConfig) -> Self {
        let mut profile = Self::named(config.profile);
        if let Some(k) = config.top_k {
            profile.top_k = k;
        }
        if let Some(system) = &config.system_prompt {
            profile.system = system.clone();
        }
        profile
    }

    pub fn render_user(&self, question: &str, context: &str) -> String {
        match self.layout {
            PromptLayout::ContextFirst => format!("Context:\n{}\n\nQuestion: {}", context, question),
            PromptLayout::QuestionFirst => format!("Question: {}\n\nContext:\n{}", question, context),
        }
    }
}

impl Default for PromptProfile {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_puts_context_first() {
        let p = PromptProfile::standard();
        assert_eq!(p.top_k, 5);
        assert_eq!(p.render_user("Q?", "C1\nC2"), "Context:\nC1\nC2\n\nQuestion: Q?");
    }

    #[test]
    fn legacy_puts_question_first() {
        let p = PromptProfile::legacy();
        assert_eq!(p.top_k, 3);
        assert!(p.system.contains("Contra Costa County COVID-19"));
        assert_eq!(p.render_user("Q?", "C1"), "Question: Q?\n\nContext:\nC1");
    }

    #[test]
    fn config_overrides() {
        let config = RetrievalConfig {
            profile: ProfileName::Legacy,
            top_k: Some(8),
            system_prompt: Some("Answer in French.".to_string()),
            ..Default::default()
        };
        let p = PromptProfile::from_config(&config);
        assert_eq!(p.top_k, 8);
        assert_eq!(p.system, "Answer in French.");
        assert_eq!(p.layout, PromptLayout::QuestionFirst);
    }

    #[test]
    fn placeholders_in_context_are_left_alone() {
        let p = PromptProfile::standard();
        let user = p.render_user("real question", "text with {question} inside");
        assert!(user.contains("text with {question} inside"));
    }
}
