//! Routing inspection command

use crate::output::print_route;
use anyhow::Result;
use toolflow_core::Router;

/// Show which tool would handle a query, without running it
pub fn route_command(query: &str) -> Result<()> {
    let decision = Router::default().decide(query);
    print_route(query, &decision);
    Ok(())
}
