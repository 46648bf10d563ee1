pub mod answer;
pub mod pipeline;
pub mod profile;

pub use answer::{build_context, AnswerGenerator};
pub use pipeline::{Answer, DynPipeline, QueryPipeline};
pub use profile::{PromptLayout, PromptProfile};
