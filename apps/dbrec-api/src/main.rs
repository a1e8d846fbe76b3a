use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = dbrec_api::Args::parse();

	dbrec_api::run(args).await
}
