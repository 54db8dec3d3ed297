//! Command-line surface.

pub mod check;
pub mod completions;
pub mod config;
pub mod run;
pub mod wait;

pub use check::CheckCommand;
pub use completions::CompletionsCommand;
pub use config::ConfigCommand;
pub use run::RunCommand;
pub use wait::WaitCommand;
