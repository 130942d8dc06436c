use std::path::Path;

use serde_json::json;

use trove_chunking::ChunkingConfig;
use trove_storage::{chunks, models::NewChunk};

use crate::{Error, Result, TroveService, ensure_dimension, vector_to_pg};

#[derive(Debug, Default, Clone, Copy, serde::Serialize)]
pub struct IngestReport {
	pub files: usize,
	pub chunks: usize,
}

impl TroveService {
	/// Ingest one file: read, chunk, embed, and store, replacing any chunks previously
	/// ingested for the same source path. Returns the number of chunks stored.
	pub async fn ingest_file(&self, path: &Path) -> Result<usize> {
		let text = std::fs::read_to_string(path).map_err(|err| Error::InvalidRequest {
			message: format!("Failed to read {}: {err}", path.display()),
		})?;
		let source = path.to_string_lossy();

		self.ingest_text(&source, &text).await
	}

	/// Ingest raw text under a source identifier. The delete-then-insert pair runs in one
	/// transaction so readers never observe a half-replaced source.
	pub async fn ingest_text(&self, source: &str, text: &str) -> Result<usize> {
		if source.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "Source must be non-empty.".to_string() });
		}

		let chunking = ChunkingConfig {
			max_chars: self.cfg.chunking.max_chars as usize,
			min_chars: self.cfg.chunking.min_chars as usize,
		};
		let pieces = trove_chunking::split_text(text, &chunking);

		if pieces.is_empty() {
			tracing::warn!(source, "No chunks produced; skipping source.");

			return Ok(0);
		}

		let texts: Vec<String> = pieces.iter().map(|piece| piece.text.clone()).collect();
		let embeddings =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await?;

		if embeddings.len() != texts.len() {
			return Err(Error::Provider {
				message: "Embedding provider returned mismatched vector count.".to_string(),
			});
		}

		for embedding in &embeddings {
			ensure_dimension(&self.cfg, embedding)?;
		}

		let mut tx = self.db.pool.begin().await?;
		let replaced = chunks::delete_by_source(&mut *tx, source).await?;

		for (piece, embedding) in pieces.iter().zip(embeddings.iter()) {
			let chunk = NewChunk {
				content: piece.text.clone(),
				metadata: json!({ "chunk_index": piece.chunk_index }),
				embedding: Some(vector_to_pg(embedding)),
			};

			chunks::insert_chunk(&mut *tx, source, &chunk).await?;
		}

		tx.commit().await?;

		tracing::info!(source, chunks = pieces.len(), replaced, "Ingested source.");

		Ok(pieces.len())
	}
}
