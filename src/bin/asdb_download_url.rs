use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use workspace_vars::cli::{AsdbDownloadUrlArgs, finish};
use workspace_vars::logging::init_logging;
use workspace_vars::providers::HttpPageFetcher;
use workspace_vars::services::{ArtifactQuery, ArtifactResolver};
use workspace_vars::{Result, load_config};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    finish(run(AsdbDownloadUrlArgs::parse()).await)
}

async fn run(args: AsdbDownloadUrlArgs) -> Result<()> {
    let mut config = load_config()?;
    if args.distro.is_some() {
        config.artifacts.distro = args.distro;
    }
    if args.arch.is_some() {
        config.artifacts.arch = args.arch;
    }
    if args.asdb_version.is_some() {
        config.artifacts.version = args.asdb_version;
    }

    let query = ArtifactQuery::from_config(&config.artifacts)?;
    let resolver = ArtifactResolver::new(Arc::new(HttpPageFetcher::new()?), &config.artifacts);

    let url = resolver.resolve(&query).await?;
    println!("{}", url);
    Ok(())
}
