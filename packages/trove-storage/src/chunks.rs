use sqlx::PgExecutor;

use crate::{
	Result,
	models::{ChunkRow, CollectionStats, NewChunk, ScoredChunkRow},
};

pub async fn insert_chunk<'e, E>(executor: E, source: &str, chunk: &NewChunk) -> Result<i64>
where
	E: PgExecutor<'e>,
{
	let id = sqlx::query_scalar(
		"\
INSERT INTO chunks (source, content, embedding, metadata)
VALUES ($1, $2, $3::text::vector, $4)
RETURNING id",
	)
	.bind(source)
	.bind(chunk.content.as_str())
	.bind(chunk.embedding.as_deref())
	.bind(&chunk.metadata)
	.fetch_one(executor)
	.await?;

	Ok(id)
}

/// Remove every chunk belonging to one source. Used before re-ingesting that source so
/// stale chunks never coexist with fresh ones.
pub async fn delete_by_source<'e, E>(executor: E, source: &str) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM chunks WHERE source = $1")
		.bind(source)
		.execute(executor)
		.await?;

	Ok(result.rows_affected())
}

/// Nearest-first chunk ids by cosine distance. Chunks without an embedding are excluded,
/// never ranked; exact-distance ties break by ascending id so a fixed snapshot always
/// ranks the same way.
pub async fn vector_candidates<'e, E>(executor: E, query_vec: &str, limit: i64) -> Result<Vec<i64>>
where
	E: PgExecutor<'e>,
{
	let ids = sqlx::query_scalar(
		"\
SELECT id
FROM chunks
WHERE embedding IS NOT NULL
ORDER BY embedding <=> $1::text::vector ASC, id ASC
LIMIT $2",
	)
	.bind(query_vec)
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(ids)
}

/// Best-first chunk ids by full-text relevance. Only chunks matching at least one query
/// term appear; non-matching chunks are excluded rather than ranked at zero.
pub async fn lexical_candidates<'e, E>(executor: E, query: &str, limit: i64) -> Result<Vec<i64>>
where
	E: PgExecutor<'e>,
{
	let ids = sqlx::query_scalar(
		"\
SELECT id
FROM chunks
WHERE lexical_index @@ websearch_to_tsquery('english', $1)
ORDER BY ts_rank_cd(lexical_index, websearch_to_tsquery('english', $1)) DESC, id ASC
LIMIT $2",
	)
	.bind(query)
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(ids)
}

/// Vector-only search with the ranker's native score, `1 - cosine_distance`.
pub async fn vector_search<'e, E>(
	executor: E,
	query_vec: &str,
	limit: i64,
) -> Result<Vec<ScoredChunkRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, ScoredChunkRow>(
		"\
SELECT
	id,
	source,
	content,
	COALESCE(metadata, '{}'::jsonb) AS metadata,
	(1 - (embedding <=> $1::text::vector))::real AS score
FROM chunks
WHERE embedding IS NOT NULL
ORDER BY embedding <=> $1::text::vector ASC, id ASC
LIMIT $2",
	)
	.bind(query_vec)
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Lexical-only search with the ranker's native `ts_rank_cd` score.
pub async fn lexical_search<'e, E>(
	executor: E,
	query: &str,
	limit: i64,
) -> Result<Vec<ScoredChunkRow>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, ScoredChunkRow>(
		"\
SELECT
	id,
	source,
	content,
	COALESCE(metadata, '{}'::jsonb) AS metadata,
	ts_rank_cd(lexical_index, websearch_to_tsquery('english', $1))::real AS score
FROM chunks
WHERE lexical_index @@ websearch_to_tsquery('english', $1)
ORDER BY score DESC, id ASC
LIMIT $2",
	)
	.bind(query)
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Point lookup of full chunk rows by id set; order is unspecified, callers re-order.
pub async fn fetch_by_ids<'e, E>(executor: E, ids: &[i64]) -> Result<Vec<ChunkRow>>
where
	E: PgExecutor<'e>,
{
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let rows = sqlx::query_as::<_, ChunkRow>(
		"\
SELECT
	id,
	source,
	content,
	COALESCE(metadata, '{}'::jsonb) AS metadata,
	created_at
FROM chunks
WHERE id = ANY($1)",
	)
	.bind(ids)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn collection_stats<'e, E>(executor: E) -> Result<CollectionStats>
where
	E: PgExecutor<'e>,
{
	let stats = sqlx::query_as::<_, CollectionStats>(
		"\
SELECT
	COUNT(DISTINCT source) AS sources,
	COUNT(*) AS chunks,
	COUNT(embedding) AS embedded_chunks
FROM chunks",
	)
	.fetch_one(executor)
	.await?;

	Ok(stats)
}
