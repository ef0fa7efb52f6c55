//! Cheap pre-filter that keeps obviously off-topic questions away from the LLM.

pub mod router;

pub use router::{TopicClass, TopicRouter};
