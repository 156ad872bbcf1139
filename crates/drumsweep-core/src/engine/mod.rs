//! # Engine Module
//!
//! The simulation engine is an external collaborator. This module defines the
//! narrow interface the sweep needs from it and the concrete ways of talking to
//! LAMMPS.
//!
//! - [`Engine`]: run an input script, run one command, close the session.
//! - [`process::LammpsProcess`]: a live `lmp` child fed through standard input.
//! - [`script::ScriptWriter`]: emits the command stream as an input file.
//! - [`recording::RecordingEngine`]: keeps the stream in memory.
//!
//! The sweep configuration, error types and progress hooks live here too,
//! since they describe what is handed to and reported from an engine session.

pub mod config;
pub mod error;
pub mod process;
pub mod progress;
pub mod recording;
pub mod script;

use error::EngineError;
use std::path::Path;

/// A session with a simulation engine that accepts LAMMPS-style input.
///
/// Every call blocks until the engine has finished the request. An error from
/// any call means the session can no longer be trusted.
pub trait Engine {
    /// Loads and executes the named input script.
    fn file(&mut self, path: &Path) -> Result<(), EngineError>;

    /// Executes a single line of engine input.
    fn command(&mut self, command: &str) -> Result<(), EngineError>;

    /// Ends the session, reporting a failure that only shows at shutdown.
    fn close(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

