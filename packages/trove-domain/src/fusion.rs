//! Reciprocal Rank Fusion over the vector and lexical candidate lists.
//!
//! Fusion works on rank positions only, so the two rankers' native scores never need to
//! share a scale. Every chunk appearing in either list survives into the fused set; a
//! chunk ranked by one list alone keeps its single reciprocal-rank term.

use std::collections::HashMap;

/// Default dampening constant. Larger values flatten the contribution curve so a single
/// ranker's rank-1 item does not dominate the fused order.
pub const DEFAULT_RRF_K: u32 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct FusedCandidate {
	pub chunk_id: i64,
	/// Sum of `1 / (k + rank)` over the lists that ranked this chunk. Ordinal only: the
	/// theoretical maximum is `2 / (k + 1)`, not 1.
	pub score: f32,
	/// 1-based position in the vector list, if ranked there.
	pub vector_rank: Option<u32>,
	/// 1-based position in the lexical list, if ranked there.
	pub lexical_rank: Option<u32>,
}

/// Fuse two ranked id lists, best first, into at most `limit` candidates.
///
/// Ordering is fused score descending, ties broken by ascending chunk id so a fixed
/// input always produces a fixed output.
pub fn reciprocal_rank_fusion(
	vector: &[i64],
	lexical: &[i64],
	k: u32,
	limit: usize,
) -> Vec<FusedCandidate> {
	let mut by_id: HashMap<i64, FusedCandidate> = HashMap::with_capacity(vector.len() + lexical.len());

	for (position, chunk_id) in vector.iter().enumerate() {
		let rank = position as u32 + 1;
		let entry = by_id.entry(*chunk_id).or_insert_with(|| FusedCandidate {
			chunk_id: *chunk_id,
			score: 0.0,
			vector_rank: None,
			lexical_rank: None,
		});

		entry.vector_rank = Some(rank);
		entry.score += contribution(k, rank);
	}
	for (position, chunk_id) in lexical.iter().enumerate() {
		let rank = position as u32 + 1;
		let entry = by_id.entry(*chunk_id).or_insert_with(|| FusedCandidate {
			chunk_id: *chunk_id,
			score: 0.0,
			vector_rank: None,
			lexical_rank: None,
		});

		entry.lexical_rank = Some(rank);
		entry.score += contribution(k, rank);
	}

	let mut fused: Vec<FusedCandidate> = by_id.into_values().collect();

	fused.sort_by(|a, b| {
		b.score
			.partial_cmp(&a.score)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| a.chunk_id.cmp(&b.chunk_id))
	});
	fused.truncate(limit);

	fused
}

fn contribution(k: u32, rank: u32) -> f32 {
	1.0 / (k as f32 + rank as f32)
}
