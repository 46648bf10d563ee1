use ccbot_config::{ProfileName, RetrievalConfig};
use ccbot_core::embeddings::{Embedder, HashingEmbedder};
use ccbot_core::llm::{ChatMessage, EchoGenerator, Generator, Role};
use ccbot_core::{Chunk, ChunkMetadata, Counters, Error, Period};
use ccbot_index::{IndexBuilder, Retriever};
use ccbot_pipeline::{build_context, AnswerGenerator, DynPipeline, PromptProfile, QueryPipeline};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Mutex;
use tempfile::tempdir;

const DIM: usize = 4096;

fn chunks() -> Vec<Chunk> {
    ["Contra Costa", "Alameda", "Solano", "Napa", "Marin", "Sonoma"]
        .iter()
        .enumerate()
        .map(|(i, county)| {
            Chunk::render(
                ChunkMetadata {
                    county: county.to_string(),
                    period: Period::Daily {
                        date: NaiveDate::from_ymd_opt(2022, 1, i as u32 + 1).unwrap(),
                    },
                    demographic_category: "Age Group".to_string(),
                    demographic_value: "18-49".to_string(),
                },
                &Counters {
                    fully_vaccinated: (i as f64 + 1.0) * 11.0,
                    ..Default::default()
                },
            )
        })
        .collect()
}

fn build(stem: &Path) {
    IndexBuilder::new(HashingEmbedder::new(DIM))
        .build(&chunks(), stem)
        .unwrap();
}

/// Keeps every prompt it receives
#[derive(Default)]
struct Recording {
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl Generator for Recording {
    fn generate(&self, messages: &[ChatMessage]) -> ccbot_core::Result<String> {
        self.seen.lock().unwrap().push(messages.to_vec());
        Ok("recorded".to_string())
    }

    fn model_id(&self) -> &str {
        "recording"
    }
}

struct Failing;

impl Generator for Failing {
    fn generate(&self, _messages: &[ChatMessage]) -> ccbot_core::Result<String> {
        Err(Error::GenerationService("503 from provider".to_string()))
    }

    fn model_id(&self) -> &str {
        "failing"
    }
}

#[test]
fn standard_profile_sends_context_then_question() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let stem = dir.path().join("daily_index");
    build(&stem);

    let recorder = std::sync::Arc::new(Recording::default());
    let pipeline = QueryPipeline::new(
        Retriever::open(&stem, HashingEmbedder::new(DIM))?,
        AnswerGenerator::new(recorder.clone(), PromptProfile::standard()),
    );

    let answer = pipeline.ask("  How many in Contra Costa?  ", None)?;
    assert_eq!(answer.text, "recorded");
    assert_eq!(answer.sources.len(), 5);

    let seen = recorder.seen.lock().unwrap();
    let messages = &seen[0];
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(
        messages[0].content,
        "You are a helpful assistant answering questions about vaccination data."
    );
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(
        messages[1].content,
        format!(
            "Context:\n{}\n\nQuestion: How many in Contra Costa?",
            build_context(&answer.sources)
        )
    );
    Ok(())
}

#[test]
fn legacy_profile_defaults_to_three() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let stem = dir.path().join("daily_index");
    build(&stem);

    let pipeline = QueryPipeline::new(
        Retriever::open(&stem, HashingEmbedder::new(DIM))?,
        AnswerGenerator::new(EchoGenerator, PromptProfile::legacy()),
    );
    assert_eq!(pipeline.default_k(), 3);

    let answer = pipeline.ask("Solano fully vaccinated", None)?;
    assert_eq!(answer.sources.len(), 3);
    assert!(answer.text.starts_with("Question: Solano fully vaccinated\n\nContext:\n"));
    assert!(answer.text.contains(&answer.sources[0].chunk.text));

    let answer = pipeline.ask("Solano fully vaccinated", Some(1))?;
    assert_eq!(answer.sources.len(), 1);
    Ok(())
}

#[test]
fn config_profile_and_dyn_providers() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let stem = dir.path().join("daily_index");
    build(&stem);

    let config = RetrievalConfig {
        profile: ProfileName::Standard,
        top_k: Some(2),
        ..Default::default()
    };
    let embedder: Box<dyn Embedder> = Box::new(HashingEmbedder::new(DIM));
    let generator: Box<dyn Generator> = Box::new(EchoGenerator);
    let pipeline: DynPipeline = QueryPipeline::new(
        Retriever::open(&stem, embedder)?,
        AnswerGenerator::new(generator, PromptProfile::from_config(&config)),
    );

    let answer = pipeline.ask("Napa", None)?;
    assert_eq!(answer.sources.len(), 2);
    assert_eq!(answer.sources[0].chunk.metadata.county, "Napa");
    Ok(())
}

#[test]
fn provider_failure_surfaces_as_generation_error() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let stem = dir.path().join("daily_index");
    build(&stem);

    let pipeline = QueryPipeline::new(
        Retriever::open(&stem, HashingEmbedder::new(DIM))?,
        AnswerGenerator::new(Failing, PromptProfile::standard()),
    );
    let err = pipeline.ask("anything", None).unwrap_err();
    assert!(matches!(err, Error::GenerationService(_)));
    Ok(())
}

#[test]
fn blank_question_is_rejected() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let stem = dir.path().join("daily_index");
    build(&stem);

    let pipeline = QueryPipeline::new(
        Retriever::open(&stem, HashingEmbedder::new(DIM))?,
        AnswerGenerator::new(EchoGenerator, PromptProfile::standard()),
    );
    assert!(matches!(pipeline.ask(" \n ", None), Err(Error::EmptyQuery)));
    Ok(())
}
