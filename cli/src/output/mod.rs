//! Console output for workflow records, tools and routing decisions

pub mod printer;

pub use printer::{print_record, print_route, print_tools};
