use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = wayfind_api::Args::parse();

	wayfind_api::run(args).await
}
