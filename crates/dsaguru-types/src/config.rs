//! Configuration types for DSA Guru.
//!
//! `GuruConfig` represents the top-level `config.toml` that controls the
//! daily quota, the topic router vocabulary, the LLM endpoint, and the
//! system instruction sent with every question. All fields have defaults.

use serde::{Deserialize, Serialize};

use crate::chat::DEFAULT_REFUSAL_MESSAGE;
use crate::llm::ProviderType;
use crate::quota::DEFAULT_MAX_DAILY_QUERIES;

/// Domain terms that mark a question as in scope.
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "stack", "queue", "array", "linked list", "tree", "graph", "sort", "search",
    "algorithm", "data structure", "binary", "heap", "hash", "recursion", "dynamic",
    "programming", "greedy", "backtrack", "dfs", "bfs", "traversal", "insertion",
    "selection", "bubble", "merge", "quick", "radix", "counting", "bucket",
    "linear", "binary search", "complexity", "time", "space", "big o", "o(n)",
    "leetcode", "coding", "interview", "problem", "solve", "optimize", "efficient",
    "node", "pointer", "index", "iterate", "loop", "condition", "base case",
    "inorder", "preorder", "postorder", "level order", "depth", "breadth",
    "adjacency", "matrix", "list", "directed", "undirected", "weighted", "cycle",
    "shortest path", "minimum", "maximum", "peak", "valley", "sliding window",
    "two pointer", "fast slow", "kadane", "fibonacci", "factorial", "gcd", "lcm",
    "dsa", "data structures", "algorithms",
];

/// Whole-word question openers that also mark a question as in scope.
pub const DEFAULT_INTERROGATIVES: &[&str] = &[
    "what", "how", "explain", "solve", "implement", "code", "write", "find",
    "calculate", "optimize",
];

/// Default instruction sent to the model with every question.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a Data Structures and Algorithms Instructor \
with expertise in Java, teaching in the friendly, expressive style of a well-known Indian college senior. \
Respond only to queries related to Data Structures and Algorithms, using Java for code snippets unless \
the user asks for another language. For non-DSA queries, refuse briefly and steer the student back to DSA.\n\
Teaching style: emphasize recognizable patterns (two pointers, sliding window, and so on); break topics \
into clear steps with pseudocode; use humor and real-life analogies (stacks as a pile of plates); \
reinforce key points; keep content exam- and interview-relevant; use an occasional colloquial Hindi \
phrase (\"Dekho bhaiya, yeh concept aisa hai\").\n\
For concept questions: give a beginner-friendly explanation with Java code, time/space complexity, \
an analogy, and an example.\n\
For problems: present a brute force approach, a better approach when one exists, and the optimal \
approach, each with algorithm, well-commented Java code, and complexity analysis, then compare them.\n\
For gratitude: respond graciously and encourage more practice.";

/// Top-level configuration for DSA Guru.
///
/// Loaded from `~/.dsaguru/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuruConfig {
    /// Instruction sent to the model alongside every in-scope question.
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,

    #[serde(default)]
    pub quota: QuotaConfig,

    #[serde(default)]
    pub topic: TopicConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

impl Default for GuruConfig {
    fn default() -> Self {
        Self {
            system_instruction: default_system_instruction(),
            quota: QuotaConfig::default(),
            topic: TopicConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

fn default_system_instruction() -> String {
    DEFAULT_SYSTEM_INSTRUCTION.to_string()
}

/// Daily quota settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Questions each user may ask per UTC day.
    #[serde(default = "default_max_daily_queries")]
    pub max_daily_queries: u32,

    /// Whether an off-topic refusal consumes a quota unit.
    #[serde(default)]
    pub charge_off_topic: bool,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_daily_queries: default_max_daily_queries(),
            charge_off_topic: false,
        }
    }
}

fn default_max_daily_queries() -> u32 {
    DEFAULT_MAX_DAILY_QUERIES
}

/// Topic router vocabulary and refusal text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicConfig {
    #[serde(default = "default_vocabulary")]
    pub vocabulary: Vec<String>,

    #[serde(default = "default_interrogatives")]
    pub interrogatives: Vec<String>,

    #[serde(default = "default_refusal_message")]
    pub refusal_message: String,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            vocabulary: default_vocabulary(),
            interrogatives: default_interrogatives(),
            refusal_message: default_refusal_message(),
        }
    }
}

fn default_vocabulary() -> Vec<String> {
    DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect()
}

fn default_interrogatives() -> Vec<String> {
    DEFAULT_INTERROGATIVES.iter().map(|s| s.to_string()).collect()
}

fn default_refusal_message() -> String {
    DEFAULT_REFUSAL_MESSAGE.to_string()
}

/// Hosted LLM endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: ProviderType,

    #[serde(default = "default_model")]
    pub model: String,

    /// Endpoint override. `None` uses the provider's public API.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default)]
    pub temperature: Option<f64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_output_tokens: default_max_output_tokens(),
            temperature: None,
        }
    }
}

fn default_provider() -> ProviderType {
    ProviderType::Gemini
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_output_tokens() -> u32 {
    8_192
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guru_config_default_values() {
        let config = GuruConfig::default();
        assert_eq!(config.quota.max_daily_queries, 5);
        assert!(!config.quota.charge_off_topic);
        assert_eq!(config.llm.provider, ProviderType::Gemini);
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert!(config.topic.vocabulary.iter().any(|t| t == "binary search"));
    }

    #[test]
    fn test_guru_config_deserialize_with_defaults() {
        let config: GuruConfig = toml::from_str("").unwrap();
        assert_eq!(config.quota.max_daily_queries, 5);
        assert_eq!(config.llm.model, "gemini-1.5-flash");
        assert_eq!(config.system_instruction, DEFAULT_SYSTEM_INSTRUCTION);
    }

    #[test]
    fn test_guru_config_deserialize_with_values() {
        let toml_str = r#"
system_instruction = "Answer tersely."

[quota]
max_daily_queries = 10
charge_off_topic = true

[topic]
vocabulary = ["trie", "segment tree"]

[llm]
provider = "openai_compatible"
model = "gpt-4o-mini"
base_url = "http://localhost:8080/v1"
api_key_env = "OPENAI_API_KEY"
temperature = 0.2
"#;
        let config: GuruConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.system_instruction, "Answer tersely.");
        assert_eq!(config.quota.max_daily_queries, 10);
        assert!(config.quota.charge_off_topic);
        assert_eq!(config.topic.vocabulary, vec!["trie", "segment tree"]);
        // Unset topic fields keep their defaults
        assert_eq!(config.topic.interrogatives.len(), DEFAULT_INTERROGATIVES.len());
        assert_eq!(config.llm.provider, ProviderType::OpenAiCompatible);
        assert_eq!(config.llm.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.llm.timeout_secs, 60);
        assert_eq!(config.llm.temperature, Some(0.2));
    }
}
