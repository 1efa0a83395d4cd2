//! Project configuration

mod loader;

pub(crate) use loader::is_excluded;
pub use loader::{Config, PluginConfig, ReportConfig};
