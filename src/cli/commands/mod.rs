//! One module per subcommand.

pub mod audit_cmd;
pub mod clear;
pub mod completions;
pub mod get;
pub mod set;
pub mod status;
