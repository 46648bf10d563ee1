//! Retrieval and prompt configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which prompt profile the answer generator uses
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfileName {
    /// k=5, context before question
    #[default]
    Standard,
    /// k=3, question before context
    Legacy,
}

impl ProfileName {
    pub const NAMES: [&'static str; 2] = ["standard", "legacy"];

    pub fn parse(value: &str) -> crate::error::Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "legacy" => Ok(Self::Legacy),
            _ => Err(crate::error::ConfigError::invalid_enum(
                "retrieval.profile",
                value,
                &Self::NAMES,
            )),
        }
    }
}

/// Chunk granularity, also selects which index is queried
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Daily,
    Weekly,
}

impl Granularity {
    pub const NAMES: [&'static str; 2] = ["daily", "weekly"];

    pub fn parse(value: &str) -> crate::error::Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(crate::error::ConfigError::invalid_enum(
                "retrieval.granularity",
                value,
                &Self::NAMES,
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default)]
    pub profile: ProfileName,

    /// Overrides the profile's default k
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,

    #[serde(default)]
    pub granularity: Granularity,

    /// Overrides the profile's system instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl crate::validation::Validate for RetrievalConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if let Some(k) = self.top_k {
            crate::validation::validate_positive("retrieval.top_k", k, 0)?;
        }
        if let Some(prompt) = &self.system_prompt {
            crate::validation::validate_non_empty("retrieval.system_prompt", prompt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = RetrievalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.profile, ProfileName::Standard);
        assert_eq!(config.granularity, Granularity::Daily);
    }

    #[test]
    fn test_zero_top_k_invalid() {
        let config = RetrievalConfig {
            top_k: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(ProfileName::parse("LEGACY").unwrap(), ProfileName::Legacy);
        assert_eq!(Granularity::parse("weekly").unwrap(), Granularity::Weekly);
        assert!(Granularity::parse("monthly").is_err());
    }
}
