use super::Engine;
use super::error::EngineError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issued {
    File(PathBuf),
    Command(String),
}

/// An engine that remembers what it was asked to do and does nothing else.
///
/// `reject_when` makes it refuse the first command starting with a prefix,
/// which lets callers exercise the sweep's failure path without LAMMPS.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    issued: Vec<Issued>,
    reject_prefix: Option<String>,
    closed: bool,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_when(mut self, prefix: impl Into<String>) -> Self {
        self.reject_prefix = Some(prefix.into());
        self
    }

    pub fn issued(&self) -> &[Issued] {
        &self.issued
    }

    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.issued.iter().filter_map(|i| match i {
            Issued::Command(c) => Some(c.as_str()),
            Issued::File(_) => None,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Engine for RecordingEngine {
    fn file(&mut self, path: &Path) -> Result<(), EngineError> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        self.issued.push(Issued::File(path.to_path_buf()));
        Ok(())
    }

    fn command(&mut self, command: &str) -> Result<(), EngineError> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        if let Some(prefix) = &self.reject_prefix {
            if command.starts_with(prefix.as_str()) {
                return Err(EngineError::Rejected {
                    command: command.to_string(),
                    reason: "rejected by recording engine".to_string(),
                });
            }
        }
        self.issued.push(Issued::Command(command.to_string()));
        Ok(())
    }

    fn close(&mut self) -> Result<(), EngineError> {
        self.closed = true;
        Ok(())
    }
}
