//! Tools listing command

use crate::config::CliConfigLoader;
use crate::output::print_tools;
use crate::tools::create_cli_tool_registry;
use anyhow::Result;
use tracing::info;

/// Show available tools
pub async fn tools_command(config_loader: CliConfigLoader) -> Result<()> {
    info!("Listing available tools");

    let config = config_loader.load().await?;
    let registry = create_cli_tool_registry(&config.workflow)?;
    print_tools(&registry);

    Ok(())
}
