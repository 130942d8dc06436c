use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use trove_service::{ScoredResult, SearchMode, SearchRequest, TroveService};
use trove_storage::db::Db;

const CONTENT_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Parser)]
#[command(
	version = trove_cli::VERSION,
	rename_all = "kebab",
	styles = trove_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Search query.
	#[arg(value_name = "QUERY")]
	pub query: String,
	#[arg(long, short = 'm', value_enum, default_value_t = Mode::Hybrid)]
	pub mode: Mode,
	/// Number of results; defaults to the configured top_k.
	#[arg(long, short = 'n', value_name = "N")]
	pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
	Vector,
	Lexical,
	Hybrid,
}
impl From<Mode> for SearchMode {
	fn from(mode: Mode) -> Self {
		match mode {
			Mode::Vector => Self::Vector,
			Mode::Lexical => Self::Lexical,
			Mode::Hybrid => Self::Hybrid,
		}
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = trove_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = Db::connect(&config.storage.postgres).await?;
	let service = TroveService::new(config, db);
	let mode = SearchMode::from(args.mode);
	let response = service
		.search(SearchRequest { query: args.query.clone(), limit: args.limit, mode: Some(mode) })
		.await?;

	print_results(&args.query, mode, &response.results);

	Ok(())
}

fn print_results(query: &str, mode: SearchMode, results: &[ScoredResult]) {
	if results.is_empty() {
		println!("No results found.");

		return;
	}

	println!("Results for: {query} ({mode})");
	println!("{}", "=".repeat(60));

	for (position, result) in results.iter().enumerate() {
		println!("\n[{}] {} (score: {:.4})", position + 1, result.source, result.score);
		println!("{}", "-".repeat(40));
		println!("{}", preview(&result.content));
	}

	println!("\n{}", "=".repeat(60));
}

fn preview(content: &str) -> String {
	if content.len() <= CONTENT_PREVIEW_CHARS {
		return content.to_string();
	}

	let mut cut = CONTENT_PREVIEW_CHARS;

	while !content.is_char_boundary(cut) {
		cut -= 1;
	}

	format!("{}...", &content[..cut])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn preview_truncates_long_content() {
		let long = "x".repeat(600);
		let shown = preview(&long);

		assert!(shown.ends_with("..."));
		assert_eq!(shown.len(), CONTENT_PREVIEW_CHARS + 3);
	}

	#[test]
	fn preview_keeps_short_content_whole() {
		assert_eq!(preview("short"), "short");
	}
}
