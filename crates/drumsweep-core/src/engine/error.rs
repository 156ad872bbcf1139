use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to launch engine '{program}': {source}", program = program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Input script not found: {}", path.display())]
    ScriptNotFound { path: PathBuf },

    #[error("Engine rejected command '{command}': {reason}")]
    Rejected { command: String, reason: String },

    #[error("Engine did not shut down cleanly ({status})")]
    Shutdown { status: ExitStatus },

    #[error("Engine session is already closed")]
    Closed,

    #[error("Engine I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Run with {period} steps per rotation failed: {source}")]
    Sweep {
        period: u64,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// The command text the engine refused, looking through sweep context.
    pub fn rejected_command(&self) -> Option<&str> {
        match self {
            EngineError::Rejected { command, .. } => Some(command),
            EngineError::Sweep { source, .. } => source.rejected_command(),
            _ => None,
        }
    }
}
