//! The migration session: step machine, switch protocol, orchestrator

pub mod migration_session;
pub mod steps;
pub mod switch;

pub use migration_session::MigrationSession;
pub use steps::StepMachine;
pub use switch::SwitchPrompt;
