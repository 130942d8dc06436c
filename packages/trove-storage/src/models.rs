use serde_json::Value;
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChunkRow {
	pub id: i64,
	pub source: String,
	pub content: String,
	pub metadata: Value,
	pub created_at: OffsetDateTime,
}

/// A chunk row scored by one ranker's native scheme (cosine similarity or `ts_rank_cd`).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScoredChunkRow {
	pub id: i64,
	pub source: String,
	pub content: String,
	pub metadata: Value,
	pub score: f32,
}

#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct CollectionStats {
	pub sources: i64,
	pub chunks: i64,
	pub embedded_chunks: i64,
}

/// Chunk payload for ingestion; `embedding` is pre-rendered in pgvector text form.
#[derive(Debug, Clone)]
pub struct NewChunk {
	pub content: String,
	pub metadata: Value,
	pub embedding: Option<String>,
}
