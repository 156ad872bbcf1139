use super::Engine;
use super::error::EngineError;
use crate::core::commands::Command;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Writes the command stream as a LAMMPS input script instead of executing it.
///
/// The result can be run later with `lmp -in <file>`, under `mpirun`, or on a
/// machine where this tool is not installed.
pub struct ScriptWriter<W: Write> {
    writer: Option<W>,
    lines: usize,
}

impl<W: Write> ScriptWriter<W> {
    pub fn new(mut writer: W, header: &str) -> Result<Self, EngineError> {
        for line in header.lines() {
            writeln!(writer, "# {}", line)?;
        }
        Ok(Self {
            writer: Some(writer),
            lines: 0,
        })
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Flushes and hands back the underlying writer.
    pub fn into_inner(mut self) -> Result<W, EngineError> {
        let mut writer = self.writer.take().ok_or(EngineError::Closed)?;
        writer.flush()?;
        Ok(writer)
    }

    fn write_line(&mut self, line: &str) -> Result<(), EngineError> {
        let writer = self.writer.as_mut().ok_or(EngineError::Closed)?;
        writeln!(writer, "{}", line)?;
        self.lines += 1;
        Ok(())
    }
}

impl<W: Write> Engine for ScriptWriter<W> {
    fn file(&mut self, path: &Path) -> Result<(), EngineError> {
        let include = Command::Include {
            path: path.to_string_lossy().into_owned(),
        };
        debug!("Writing input script inclusion: {}", include);
        self.write_line(&include.to_string())
    }

    fn command(&mut self, command: &str) -> Result<(), EngineError> {
        self.write_line(command)
    }

    fn close(&mut self) -> Result<(), EngineError> {
        match self.writer.as_mut() {
            Some(writer) => Ok(writer.flush()?),
            None => Err(EngineError::Closed),
        }
    }
}
