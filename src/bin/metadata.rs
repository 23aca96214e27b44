use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use workspace_vars::cli::{MetadataAction, MetadataArgs, finish};
use workspace_vars::logging::init_logging;
use workspace_vars::providers::Terragrunt;
use workspace_vars::services::MetadataSync;
use workspace_vars::{Result, load_config, storage};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    finish(run(MetadataArgs::parse()).await)
}

async fn run(args: MetadataArgs) -> Result<()> {
    // Validated before any configuration or network access
    let Some(action) = args.action()? else {
        return Ok(());
    };

    let config = load_config()?;
    let infra = Arc::new(Terragrunt::new(config.provisioning.terragrunt_bin.clone()));
    let sync = MetadataSync::new(storage::connect(&config.storage)?, infra, &config)?;

    match action {
        MetadataAction::Upload => {
            let workspace = sync.upload().await?;
            tracing::info!(workspace = %workspace, "Metadata uploaded");
        }
        MetadataAction::Download(workspace) => {
            let downloaded = sync.download(&workspace).await?;
            tracing::info!(
                workspace = %workspace,
                common_vars = downloaded.common_vars,
                metadata = downloaded.metadata,
                "Download finished"
            );
        }
        MetadataAction::SetEnv(workspace) => {
            sync.set_env(&workspace).await?;
        }
    }

    Ok(())
}
