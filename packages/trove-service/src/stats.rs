use trove_storage::chunks;

use crate::{Result, TroveService};

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Stats {
	pub sources: i64,
	pub chunks: i64,
	pub embedded_chunks: i64,
}

impl TroveService {
	pub async fn stats(&self) -> Result<Stats> {
		let stats = chunks::collection_stats(&self.db.pool).await?;

		Ok(Stats {
			sources: stats.sources,
			chunks: stats.chunks,
			embedded_chunks: stats.embedded_chunks,
		})
	}
}
