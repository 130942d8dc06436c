pub mod ingest;
pub mod ranker;
pub mod search;
pub mod stats;

mod error;

pub use error::{Error, Result};
pub use ingest::IngestReport;
pub use ranker::{LexicalRanker, RankQuery, Ranker, Rankers, VectorRanker};
pub use search::{ScoredResult, SearchMode, SearchRequest, SearchResponse};
pub use stats::Stats;

use std::{future::Future, pin::Pin, sync::Arc};

use trove_config::{Config, EmbeddingProviderConfig};
use trove_providers::embedding;
use trove_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, trove_providers::Result<Vec<Vec<f32>>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, trove_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed_batched(cfg, texts))
	}
}

impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

pub struct TroveService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
	pub rankers: Rankers,
}
impl TroveService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let rankers = Rankers::postgres(&db.pool);

		Self { cfg, db, providers: Providers::default(), rankers }
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		let rankers = Rankers::postgres(&db.pool);

		Self { cfg, db, providers, rankers }
	}
}

/// Render a vector in pgvector's text form, `[v1,v2,...]`.
pub(crate) fn vector_to_pg(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 8);

	out.push('[');

	for (i, value) in vec.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}

		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}

/// Rejects a query or document vector whose length differs from the collection's fixed
/// dimension. Runs before any storage call; vectors are never truncated or padded.
pub(crate) fn ensure_dimension(cfg: &Config, vec: &[f32]) -> Result<()> {
	let expected = cfg.storage.postgres.vector_dim as usize;

	if vec.len() != expected {
		return Err(Error::DimensionMismatch { expected, actual: vec.len() });
	}

	Ok(())
}
