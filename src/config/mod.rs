#[cfg(feature = "cli")]
pub mod cli;
pub mod intake;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use intake::IntakeConfig;
