//! Application state wiring the question pipeline together.
//!
//! `AppState` holds the concrete pipeline used by both CLI commands and REST
//! handlers. The pipeline is generic over its quota store; `QuotaBackend`
//! pins it to either SQLite or the in-memory store chosen at startup.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use dsaguru_core::clock::{Clock, SystemClock};
use dsaguru_core::llm::BoxLlmProvider;
use dsaguru_core::pipeline::QuestionPipeline;
use dsaguru_core::quota::memory::InMemoryQuotaStore;
use dsaguru_core::quota::store::QuotaStore;
use dsaguru_infra::config::{database_url, load_guru_config, read_api_key, resolve_data_dir};
use dsaguru_infra::llm::create_provider_or_unconfigured;
use dsaguru_infra::sqlite::pool::DatabasePool;
use dsaguru_infra::sqlite::quota::SqliteQuotaStore;
use dsaguru_types::config::GuruConfig;
use dsaguru_types::error::QuotaError;
use dsaguru_types::quota::QuotaRecord;

/// Quota store selected at startup.
pub enum QuotaBackend {
    Sqlite(SqliteQuotaStore),
    Memory(InMemoryQuotaStore),
}

impl QuotaStore for QuotaBackend {
    async fn read(&self, user_id: &str) -> Result<Option<QuotaRecord>, QuotaError> {
        match self {
            QuotaBackend::Sqlite(store) => store.read(user_id).await,
            QuotaBackend::Memory(store) => store.read(user_id).await,
        }
    }

    async fn write(&self, user_id: &str, record: &QuotaRecord) -> Result<(), QuotaError> {
        match self {
            QuotaBackend::Sqlite(store) => store.write(user_id, record).await,
            QuotaBackend::Memory(store) => store.write(user_id, record).await,
        }
    }

    async fn increment_today(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<QuotaRecord, QuotaError> {
        match self {
            QuotaBackend::Sqlite(store) => store.increment_today(user_id, today).await,
            QuotaBackend::Memory(store) => store.increment_today(user_id, today).await,
        }
    }
}

pub type ConcretePipeline = QuestionPipeline<QuotaBackend>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ConcretePipeline>,
    pub config: Arc<GuruConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load config, open the quota store, and build the LLM provider.
    ///
    /// With `ephemeral`, counters live in memory and nothing is written to
    /// the data directory.
    pub async fn init(ephemeral: bool) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_guru_config(&data_dir).await;

        let store = if ephemeral {
            tracing::info!("Using in-memory quota store");
            QuotaBackend::Memory(InMemoryQuotaStore::new())
        } else {
            tokio::fs::create_dir_all(&data_dir).await?;
            let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
            QuotaBackend::Sqlite(SqliteQuotaStore::new(db_pool))
        };

        let provider =
            create_provider_or_unconfigured(&config.llm, read_api_key(&config.llm.api_key_env));

        Ok(Self::from_parts(
            store,
            provider,
            Arc::new(SystemClock),
            config,
            data_dir,
        ))
    }

    pub fn from_parts(
        store: QuotaBackend,
        provider: BoxLlmProvider,
        clock: Arc<dyn Clock>,
        config: GuruConfig,
        data_dir: PathBuf,
    ) -> Self {
        let pipeline = QuestionPipeline::from_config(store, clock, provider, &config);
        Self {
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
            data_dir,
        }
    }

    pub fn max_daily(&self) -> u32 {
        self.pipeline.gate().max_daily()
    }
}
