pub mod commands;
pub mod modules;

pub use modules::common::config::UninstallConfig;
pub use modules::common::error::{OperationError, UninstallerError};
pub use modules::notifier;
pub use modules::orchestrator;
pub use modules::reporter;
pub use modules::runner;
pub use modules::service;
