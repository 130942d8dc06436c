use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = trove_ingest::Args::parse();
	trove_ingest::run(args).await
}
