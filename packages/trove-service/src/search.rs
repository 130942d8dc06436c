use std::collections::HashMap;

use serde_json::Value;

use trove_domain::fusion;
use trove_storage::{chunks, models::ScoredChunkRow};

use crate::{Error, RankQuery, Result, TroveService, ensure_dimension, vector_to_pg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
	Vector,
	Lexical,
	Hybrid,
}
impl SearchMode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Vector => "vector",
			Self::Lexical => "lexical",
			Self::Hybrid => "hybrid",
		}
	}
}
impl std::fmt::Display for SearchMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
impl std::str::FromStr for SearchMode {
	type Err = Error;

	fn from_str(value: &str) -> Result<Self> {
		match value {
			"vector" => Ok(Self::Vector),
			"lexical" => Ok(Self::Lexical),
			"hybrid" => Ok(Self::Hybrid),
			_ => Err(Error::InvalidRequest {
				message: format!("Unknown search mode {value:?}; expected vector, lexical, or hybrid."),
			}),
		}
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
	pub query: String,
	pub limit: Option<u32>,
	pub mode: Option<SearchMode>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScoredResult {
	pub chunk_id: i64,
	pub source: String,
	pub content: String,
	pub metadata: Value,
	/// Score in the scheme named by the response's `mode`. Hybrid scores are RRF sums
	/// (ordinal, bounded by `2 / (rrf_k + 1)`); the degenerate modes carry their ranker's
	/// native score instead.
	pub score: f32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	pub mode: SearchMode,
	pub results: Vec<ScoredResult>,
}

impl TroveService {
	/// Top-level search entry point: embeds the query when the mode needs a vector, then
	/// dispatches. A blank query is not an error; it degrades to whatever can still run,
	/// which for a blank query is nothing.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let mode = req.mode.unwrap_or(SearchMode::Hybrid);
		let limit = i64::from(req.limit.unwrap_or(self.cfg.search.top_k).max(1));
		let query = req.query.trim();

		tracing::debug!(mode = %mode, limit, query_chars = query.len(), "Search requested.");

		if query.is_empty() {
			return Ok(SearchResponse { mode, results: Vec::new() });
		}

		let results = match mode {
			SearchMode::Vector => {
				let embedding = self.embed_query(query).await?;

				self.vector_search(&embedding, limit).await?
			},
			SearchMode::Lexical => self.lexical_search(query, limit).await?,
			SearchMode::Hybrid => {
				let embedding = self.embed_query(query).await?;

				self.hybrid_search(query, Some(&embedding), limit, self.cfg.search.rrf_k).await?
			},
		};

		Ok(SearchResponse { mode, results })
	}

	/// Rank-fuse the vector and lexical paths.
	///
	/// Both rankers are asked for `limit * overfetch_factor` candidates so fusion has
	/// enough material to re-order, then the fused ids are joined back against chunk
	/// storage in fused order. Either input may be absent: a missing embedding skips the
	/// vector path and a blank query skips the lexical path, with no error either way.
	pub async fn hybrid_search(
		&self,
		query_text: &str,
		query_embedding: Option<&[f32]>,
		limit: i64,
		rrf_k: u32,
	) -> Result<Vec<ScoredResult>> {
		if let Some(embedding) = query_embedding {
			ensure_dimension(&self.cfg, embedding)?;
		}

		let candidate_k = limit.saturating_mul(i64::from(self.cfg.search.overfetch_factor));
		let rank_query = RankQuery {
			text: query_text.to_string(),
			embedding: query_embedding.map(<[f32]>::to_vec),
		};
		let vector_ids = self.rankers.vector.rank(&rank_query, candidate_k).await?;
		let lexical_ids = self.rankers.lexical.rank(&rank_query, candidate_k).await?;

		tracing::debug!(
			vector_candidates = vector_ids.len(),
			lexical_candidates = lexical_ids.len(),
			"Ranker candidates collected."
		);

		if vector_ids.is_empty() && lexical_ids.is_empty() {
			return Ok(Vec::new());
		}

		let fused =
			fusion::reciprocal_rank_fusion(&vector_ids, &lexical_ids, rrf_k, limit as usize);
		let ids: Vec<i64> = fused.iter().map(|candidate| candidate.chunk_id).collect();
		let rows = chunks::fetch_by_ids(&self.db.pool, &ids).await?;
		let by_id: HashMap<i64, _> = rows.into_iter().map(|row| (row.id, row)).collect();
		let mut results = Vec::with_capacity(fused.len());

		for candidate in fused {
			let Some(row) = by_id.get(&candidate.chunk_id) else {
				tracing::warn!(chunk_id = candidate.chunk_id, "Chunk row missing for fused candidate.");

				continue;
			};

			results.push(ScoredResult {
				chunk_id: row.id,
				source: row.source.clone(),
				content: row.content.clone(),
				metadata: row.metadata.clone(),
				score: candidate.score,
			});
		}

		Ok(results)
	}

	/// Vector-only mode; scores are raw cosine similarities, not RRF values.
	pub async fn vector_search(
		&self,
		query_embedding: &[f32],
		limit: i64,
	) -> Result<Vec<ScoredResult>> {
		ensure_dimension(&self.cfg, query_embedding)?;

		let rendered = vector_to_pg(query_embedding);
		let rows = chunks::vector_search(&self.db.pool, &rendered, limit).await?;

		Ok(rows.into_iter().map(scored_row_to_result).collect())
	}

	/// Lexical-only mode; scores are raw `ts_rank_cd` values, not RRF values.
	pub async fn lexical_search(&self, query_text: &str, limit: i64) -> Result<Vec<ScoredResult>> {
		let query_text = query_text.trim();

		if query_text.is_empty() {
			return Ok(Vec::new());
		}

		let rows = chunks::lexical_search(&self.db.pool, query_text, limit).await?;

		Ok(rows.into_iter().map(scored_row_to_result).collect())
	}

	pub(crate) async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
		let embeddings = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, std::slice::from_ref(&query.to_string()))
			.await?;
		let Some(embedding) = embeddings.into_iter().next() else {
			return Err(Error::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};

		ensure_dimension(&self.cfg, &embedding)?;

		Ok(embedding)
	}
}

fn scored_row_to_result(row: ScoredChunkRow) -> ScoredResult {
	ScoredResult {
		chunk_id: row.id,
		source: row.source,
		content: row.content,
		metadata: row.metadata,
		score: row.score,
	}
}
