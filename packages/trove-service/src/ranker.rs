//! The two ranked-retrieval paths behind one seam.
//!
//! Each ranker consumes the part of the query it understands and returns chunk ids best
//! first; a chunk's 1-based rank is its position in the returned list. Fusion never sees
//! the rankers' native scores.

use std::sync::Arc;

use sqlx::PgPool;

use trove_storage::chunks;

use crate::{BoxFuture, Result};

#[derive(Debug, Clone)]
pub struct RankQuery {
	pub text: String,
	pub embedding: Option<Vec<f32>>,
}

pub trait Ranker
where
	Self: Send + Sync,
{
	fn rank<'a>(&'a self, query: &'a RankQuery, limit: i64) -> BoxFuture<'a, Result<Vec<i64>>>;
}

#[derive(Clone)]
pub struct Rankers {
	pub vector: Arc<dyn Ranker>,
	pub lexical: Arc<dyn Ranker>,
}
impl Rankers {
	pub fn postgres(pool: &PgPool) -> Self {
		Self {
			vector: Arc::new(VectorRanker::new(pool.clone())),
			lexical: Arc::new(LexicalRanker::new(pool.clone())),
		}
	}
}

pub struct VectorRanker {
	pool: PgPool,
}
impl VectorRanker {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}
}
impl Ranker for VectorRanker {
	fn rank<'a>(&'a self, query: &'a RankQuery, limit: i64) -> BoxFuture<'a, Result<Vec<i64>>> {
		Box::pin(async move {
			let Some(embedding) = query.embedding.as_deref() else {
				return Ok(Vec::new());
			};
			let rendered = crate::vector_to_pg(embedding);
			let ids = chunks::vector_candidates(&self.pool, &rendered, limit).await?;

			Ok(ids)
		})
	}
}

pub struct LexicalRanker {
	pool: PgPool,
}
impl LexicalRanker {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}
}
impl Ranker for LexicalRanker {
	fn rank<'a>(&'a self, query: &'a RankQuery, limit: i64) -> BoxFuture<'a, Result<Vec<i64>>> {
		Box::pin(async move {
			if query.text.trim().is_empty() {
				return Ok(Vec::new());
			}

			let ids = chunks::lexical_candidates(&self.pool, query.text.trim(), limit).await?;

			Ok(ids)
		})
	}
}
