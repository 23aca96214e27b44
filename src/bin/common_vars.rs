use clap::Parser;
use std::process::ExitCode;
use workspace_vars::cli::{CommonVarsArgs, finish};
use workspace_vars::logging::init_logging;
use workspace_vars::services::CommonVarsSync;
use workspace_vars::{Result, load_config, storage};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    finish(run(CommonVarsArgs::parse()).await)
}

async fn run(args: CommonVarsArgs) -> Result<()> {
    if !args.upload && !args.download {
        return Ok(());
    }

    let config = load_config()?;
    let sync = CommonVarsSync::new(storage::connect(&config.storage)?, &config)?;

    if args.upload {
        sync.upload().await?;
    }

    if args.download && !sync.download().await? {
        tracing::info!(key = %sync.key(), "No remote common vars, local file left as is");
    }

    Ok(())
}
