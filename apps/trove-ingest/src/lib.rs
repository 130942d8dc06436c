use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use trove_service::{IngestReport, TroveService};
use trove_storage::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = trove_cli::VERSION,
	rename_all = "kebab",
	styles = trove_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Files or directories to ingest; directories are walked recursively.
	#[arg(required = true, value_name = "PATH")]
	pub paths: Vec<PathBuf>,
	/// File extensions picked up when walking a directory.
	#[arg(long, value_name = "EXT", default_values_t = ["md".to_string(), "txt".to_string()])]
	pub extensions: Vec<String>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = trove_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema(config.storage.postgres.vector_dim).await?;

	let service = TroveService::new(config, db);
	let mut report = IngestReport::default();

	for path in &args.paths {
		if path.is_dir() {
			ingest_dir(&service, path, &args.extensions, &mut report).await?;
		} else {
			ingest_one(&service, path, &mut report).await?;
		}
	}

	println!("Ingestion complete: {} files, {} chunks.", report.files, report.chunks);

	Ok(())
}

async fn ingest_dir(
	service: &TroveService,
	dir: &Path,
	extensions: &[String],
	report: &mut IngestReport,
) -> color_eyre::Result<()> {
	for entry in WalkDir::new(dir).sort_by_file_name() {
		let entry = entry?;

		if !entry.file_type().is_file() {
			continue;
		}

		let matches_extension = entry
			.path()
			.extension()
			.and_then(|ext| ext.to_str())
			.map(|ext| extensions.iter().any(|wanted| wanted == ext))
			.unwrap_or(false);

		if !matches_extension {
			continue;
		}

		ingest_one(service, entry.path(), report).await?;
	}

	Ok(())
}

async fn ingest_one(
	service: &TroveService,
	path: &Path,
	report: &mut IngestReport,
) -> color_eyre::Result<()> {
	let chunks = service.ingest_file(path).await?;

	tracing::info!(path = %path.display(), chunks, "Ingested file.");

	report.files += 1;
	report.chunks += chunks;

	Ok(())
}
