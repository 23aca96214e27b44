use clap::Parser;
use std::process::ExitCode;
use workspace_vars::cli::{SetEnvVarsArgs, finish};
use workspace_vars::logging::init_logging;
use workspace_vars::models::ENV_PROPERTIES_FILENAME;
use workspace_vars::services::EnvVarExporter;
use workspace_vars::{Result, load_config, storage};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    finish(run(SetEnvVarsArgs::parse()).await)
}

async fn run(args: SetEnvVarsArgs) -> Result<()> {
    let Some(workspace) = args.workspace() else {
        return Ok(());
    };

    let config = load_config()?;
    // Written to the invocation directory, unlike `metadata --set-env`
    let properties_path = std::env::current_dir()?.join(ENV_PROPERTIES_FILENAME);

    let exporter = EnvVarExporter::new(storage::connect(&config.storage)?, properties_path);
    exporter.export(workspace).await?;
    Ok(())
}
