//! LLM provider port and the single-shot proxy used by the pipeline.

pub mod box_provider;
pub mod provider;
pub mod proxy;

pub use box_provider::BoxLlmProvider;
pub use provider::LlmProvider;
pub use proxy::LlmProxy;
