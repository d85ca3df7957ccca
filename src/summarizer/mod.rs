pub mod backend;
pub mod completion;
pub mod config;
pub mod history;
pub mod orchestrator;
pub mod paths;
pub mod record;
pub mod session;
