pub mod common;
pub mod notifier;
pub mod orchestrator;
pub mod reporter;
pub mod runner;
pub mod service;
