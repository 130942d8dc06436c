use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub search: Search,
	pub chunking: Chunking,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	/// Fixed embedding dimension of the collection. Every stored and queried vector must
	/// have exactly this length.
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	#[serde(default = "default_top_k")]
	pub top_k: u32,
	#[serde(default = "default_rrf_k")]
	pub rrf_k: u32,
	/// Both rankers are asked for `top_k * overfetch_factor` candidates so fusion has
	/// enough material to re-order.
	#[serde(default = "default_overfetch_factor")]
	pub overfetch_factor: u32,
}

#[derive(Debug, Deserialize)]
pub struct Chunking {
	pub max_chars: u32,
	pub min_chars: u32,
}

fn default_top_k() -> u32 {
	5
}

fn default_rrf_k() -> u32 {
	60
}

fn default_overfetch_factor() -> u32 {
	2
}
