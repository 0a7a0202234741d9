use anyhow::Context;
use clap::Parser;
use tracing::error;
use zimtext_cli::cli::Cli;
use zimtext_cli::error::Result;
use zimtext_cli::{logging, run};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = extract(&cli).await {
		let message = format!("{err:#}");
		error!(target = "zimtext", error = %message, "extraction failed");
		std::process::exit(1);
	}
}

async fn extract(cli: &Cli) -> Result<()> {
	let summary = run::execute(cli).await?;
	println!("{}", summary.render(cli.format).context("failed to render run summary")?);
	Ok(())
}
