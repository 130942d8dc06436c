use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = trove_search::Args::parse();
	trove_search::run(args).await
}
