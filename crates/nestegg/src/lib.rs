//! Command-line front end for the nestegg engines
//!
//! Owns everything the engines leave out: file formats, the scenario data
//! directory, terminal output and logging.

pub mod commands;
pub mod logging;
pub mod storage;
pub mod util;

pub use commands::{ProjectOptions, ScenarioAction, SimulateOptions};
pub use logging::init_logging;
pub use storage::{DataDirectory, ScenarioStore, StorageError};
