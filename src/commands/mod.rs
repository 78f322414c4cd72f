//! CLI command implementations.
//!
//! - **report**: calculate the dashboard from exported records
//! - **init**: write a default `.studioplan.toml`

pub mod init;
pub mod report;

pub use init::{init_config, init_config_in};
pub use report::{build_filters, handle_report, ReportConfig};
