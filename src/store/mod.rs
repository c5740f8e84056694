pub mod config;
pub mod modules;

pub use config::ConfigStore;
pub use modules::{InstallReport, ModuleManager};
