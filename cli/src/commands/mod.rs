//! CLI command implementations

pub mod route;
pub mod run;
pub mod tools;

pub use route::route_command;
pub use run::{run_command, RunOptions, DEMO_QUERIES};
pub use tools::tools_command;
