use unicode_segmentation::UnicodeSegmentation;

#[derive(Clone, Debug)]
pub struct ChunkingConfig {
	pub max_chars: usize,
	pub min_chars: usize,
}

#[derive(Clone, Debug)]
pub struct Chunk {
	pub chunk_index: i32,
	pub text: String,
}

/// Split `text` into chunks on blank-line paragraph boundaries.
///
/// Paragraphs are packed greedily up to `max_chars`; a finished chunk shorter than
/// `min_chars` is dropped. A single paragraph longer than `max_chars` is split on
/// sentence boundaries before packing. Deterministic for a fixed input and config.
pub fn split_text(text: &str, cfg: &ChunkingConfig) -> Vec<Chunk> {
	let mut chunks = Vec::new();
	let mut current = String::new();

	for paragraph in text.split("\n\n") {
		let paragraph = paragraph.trim();

		if paragraph.is_empty() {
			continue;
		}

		for piece in split_oversized(paragraph, cfg.max_chars) {
			if !current.is_empty() && current.len() + piece.len() > cfg.max_chars {
				flush(&mut chunks, &mut current, cfg.min_chars);
			}
			if !current.is_empty() {
				current.push_str("\n\n");
			}

			current.push_str(piece.trim_end());
		}
	}

	flush(&mut chunks, &mut current, cfg.min_chars);

	chunks
}

fn flush(chunks: &mut Vec<Chunk>, current: &mut String, min_chars: usize) {
	if current.len() >= min_chars {
		chunks.push(Chunk { chunk_index: chunks.len() as i32, text: std::mem::take(current) });
	} else {
		current.clear();
	}
}

/// Break a paragraph that alone exceeds `max_chars` into sentence-bounded pieces.
fn split_oversized(paragraph: &str, max_chars: usize) -> Vec<&str> {
	if paragraph.len() <= max_chars {
		return vec![paragraph];
	}

	let mut pieces = Vec::new();
	let mut start = 0_usize;
	let mut end = 0_usize;

	for (idx, sentence) in paragraph.split_sentence_bound_indices() {
		if end > start && idx + sentence.len() - start > max_chars {
			pieces.push(&paragraph[start..end]);

			start = idx;
		}

		end = idx + sentence.len();
	}

	if end > start {
		pieces.push(&paragraph[start..end]);
	}

	pieces
}

#[cfg(test)]
mod tests {
	use super::*;

	fn cfg(max_chars: usize, min_chars: usize) -> ChunkingConfig {
		ChunkingConfig { max_chars, min_chars }
	}

	#[test]
	fn packs_paragraphs_up_to_max_chars() {
		let text = "alpha alpha alpha.\n\nbeta beta beta.\n\ngamma gamma gamma.";
		let chunks = split_text(text, &cfg(40, 5));

		assert_eq!(chunks.len(), 2);
		assert!(chunks[0].text.contains("alpha"));
		assert!(chunks[0].text.contains("beta"));
		assert!(chunks[1].text.contains("gamma"));
		assert_eq!(chunks[0].chunk_index, 0);
		assert_eq!(chunks[1].chunk_index, 1);
	}

	#[test]
	fn drops_chunks_below_min_chars() {
		let chunks = split_text("tiny", &cfg(100, 10));

		assert!(chunks.is_empty());
	}

	#[test]
	fn splits_oversized_paragraph_on_sentence_bounds() {
		let sentence = "This sentence is a handful of words long. ";
		let paragraph = sentence.repeat(6);
		let chunks = split_text(&paragraph, &cfg(100, 10));

		assert!(chunks.len() > 1);

		for chunk in &chunks {
			assert!(chunk.text.len() <= 100, "chunk overflowed: {}", chunk.text.len());
			assert!(chunk.text.ends_with('.'));
		}
	}

	#[test]
	fn blank_input_yields_no_chunks() {
		assert!(split_text("", &cfg(100, 10)).is_empty());
		assert!(split_text("\n\n  \n\n", &cfg(100, 10)).is_empty());
	}

	#[test]
	fn chunk_indexes_are_sequential() {
		let text = "one one one one.\n\ntwo two two two.\n\nthree three three three.";
		let chunks = split_text(text, &cfg(20, 5));
		let indexes: Vec<i32> = chunks.iter().map(|chunk| chunk.chunk_index).collect();

		assert_eq!(indexes, (0..chunks.len() as i32).collect::<Vec<_>>());
	}
}
