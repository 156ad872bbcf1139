use super::Engine;
use super::error::EngineError;
use crate::core::commands::Command;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Stdio};
use tracing::{debug, info, trace, warn};

pub const DEFAULT_EXECUTABLE: &str = "lmp";

/// Echo every input line to the screen and disable output buffering, so the
/// echoed marker after a command shows up as soon as that command completes.
const ENGINE_FLAGS: [&str; 3] = ["-echo", "screen", "-nonbuf"];

const MARKER_PREFIX: &str = "# drumsweep sync";

const ENGINE_LOG_TARGET: &str = "lammps";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub executable: PathBuf,
    /// Extra arguments placed before the engine flags this crate needs.
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            args: Vec::new(),
            working_dir: None,
        }
    }
}

/// A LAMMPS executable running as a child process and reading commands from
/// its standard input.
///
/// Each request is followed by a comment line carrying a sequence number.
/// LAMMPS processes input strictly line by line and echoes each line as it is
/// read, so seeing the echoed marker on standard output proves that everything
/// sent before it has finished. If the output ends first, the engine has
/// stopped on an error and the request is reported as rejected.
pub struct LammpsProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    working_dir: Option<PathBuf>,
    sequence: u64,
    last_error: Option<String>,
}

impl LammpsProcess {
    pub fn launch(config: &LaunchConfig) -> Result<Self, EngineError> {
        let mut command = std::process::Command::new(&config.executable);
        command
            .args(&config.args)
            .args(ENGINE_FLAGS)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        if let Some(dir) = &config.working_dir {
            command.current_dir(dir);
        }

        info!(
            "Launching engine {:?} with arguments {:?}",
            &config.executable, &config.args
        );
        let mut child = command.spawn().map_err(|source| EngineError::Launch {
            program: config.executable.clone(),
            source,
        })?;

        let stdin = child.stdin.take();
        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(EngineError::Io(io::Error::other(
                    "engine standard output was not captured",
                )));
            }
        };
        debug!("Engine started with pid {}", child.id());

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            working_dir: config.working_dir.clone(),
            sequence: 0,
            last_error: None,
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    fn submit(&mut self, label: &str, lines: &[&str]) -> Result<(), EngineError> {
        self.sequence += 1;
        let marker = format!("{} {}", MARKER_PREFIX, self.sequence);

        let stdin = self.stdin.as_mut().ok_or(EngineError::Closed)?;
        let written = lines
            .iter()
            .chain(std::iter::once(&marker.as_str()))
            .try_for_each(|line| writeln!(stdin, "{}", line))
            .and_then(|_| stdin.flush());

        match written {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                return Err(self.terminated(label));
            }
            Err(e) => return Err(e.into()),
        }
        trace!("Sent '{}', waiting for marker {}", label, self.sequence);

        self.await_marker(label, &marker)
    }

    fn await_marker(&mut self, label: &str, marker: &str) -> Result<(), EngineError> {
        let mut buf = Vec::new();
        loop {
            let Some(line) = self.next_line(&mut buf)? else {
                return Err(self.terminated(label));
            };
            if line.trim() == marker {
                return Ok(());
            }
            self.observe(&line);
        }
    }

    /// Reads one line of engine output, `None` at end of stream.
    ///
    /// Engine output is not guaranteed to be UTF-8 (echoed input scripts,
    /// atom and group names), so invalid bytes are replaced rather than
    /// treated as a failure.
    fn next_line(&mut self, buf: &mut Vec<u8>) -> Result<Option<String>, EngineError> {
        buf.clear();
        if self.stdout.read_until(b'\n', buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(buf).trim_end().to_string()))
    }

    fn observe(&mut self, line: &str) {
        if line.starts_with("ERROR") {
            warn!(target: ENGINE_LOG_TARGET, "{}", line);
            self.last_error = Some(line.to_string());
        } else if line.starts_with("WARNING") {
            warn!(target: ENGINE_LOG_TARGET, "{}", line);
        } else if !line.starts_with(MARKER_PREFIX) {
            debug!(target: ENGINE_LOG_TARGET, "{}", line);
        }
    }

    /// Reaps a child whose output has ended and explains why.
    fn terminated(&mut self, label: &str) -> EngineError {
        self.stdin.take();
        let reason = match self.child.wait() {
            Ok(status) => self
                .last_error
                .take()
                .unwrap_or_else(|| format!("engine exited unexpectedly ({})", status)),
            Err(e) => format!("engine stopped responding: {}", e),
        };
        EngineError::Rejected {
            command: label.to_string(),
            reason,
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.working_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Engine for LammpsProcess {
    fn file(&mut self, path: &Path) -> Result<(), EngineError> {
        let resolved = self.resolve(path);
        if !resolved.is_file() {
            return Err(EngineError::ScriptNotFound { path: resolved });
        }

        let include = Command::Include {
            path: path.to_string_lossy().into_owned(),
        }
        .to_string();
        info!("Executing input script {:?}", path);
        // The script may switch echo off, which would hide the marker.
        self.submit(&include, &[include.as_str(), "echo screen"])
    }

    fn command(&mut self, command: &str) -> Result<(), EngineError> {
        debug!("Engine command: {}", command);
        self.submit(command, &[command])
    }

    fn close(&mut self) -> Result<(), EngineError> {
        let stdin = self.stdin.take().ok_or(EngineError::Closed)?;
        drop(stdin);

        let mut buf = Vec::new();
        while let Some(line) = self.next_line(&mut buf)? {
            self.observe(&line);
        }

        let status = self.child.wait()?;
        info!("Engine exited with {}", status);
        if !status.success() {
            return Err(EngineError::Shutdown { status });
        }
        Ok(())
    }
}

impl Drop for LammpsProcess {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            warn!("Terminating engine process {}", self.child.id());
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // Mimics the parts of `lmp -echo screen` the session relies on: input
    // lines are echoed as they are read unless `echo none` is in effect,
    // included files are read line by line, unknown commands abort with an
    // ERROR line, and `run` prints a Latin-1 degree sign.
    const FAKE_ENGINE: &str = r#"
dir=$(dirname "$0")
echo_on=1
consume() {
  if [ "$echo_on" = 1 ]; then printf '%s\n' "$1"; fi
  case "$1" in
    "echo none") echo_on=0 ;;
    "echo screen") echo_on=1 ;;
  esac
}
while IFS= read -r line; do
  printf '%s\n' "$line" >> "$dir/received.txt"
  consume "$line"
  case "$line" in
    bogus*) echo "ERROR: Unknown command: $line"; exit 1 ;;
    "include "*)
      file=${line#include }
      if [ ! -f "$file" ]; then echo "ERROR: Cannot open input script $file"; exit 1; fi
      while IFS= read -r inc; do consume "$inc"; done < "$file" ;;
    run*)
      echo "Loop time of 0.1 on 1 procs"
      printf 'Temp \260C\n' ;;
  esac
done
echo "Total wall time: 0:00:00"
exit ${FAKE_EXIT:-0}
"#;

    fn fake_engine(exit_code: i32) -> (TempDir, LaunchConfig) {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake_lmp.sh");
        let body = FAKE_ENGINE.replace("${FAKE_EXIT:-0}", &exit_code.to_string());
        fs::write(&script, body).unwrap();

        let config = LaunchConfig {
            executable: PathBuf::from("sh"),
            args: vec![script.to_string_lossy().into_owned()],
            working_dir: Some(dir.path().to_path_buf()),
        };
        (dir, config)
    }

    fn received(dir: &TempDir) -> Vec<String> {
        fs::read_to_string(dir.path().join("received.txt"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn commands_are_delivered_with_sync_markers() {
        let (dir, config) = fake_engine(0);
        fs::write(dir.path().join("in.drum"), "units si\n").unwrap();

        let mut engine = LammpsProcess::launch(&config).unwrap();
        engine.file(Path::new("in.drum")).unwrap();
        engine.command("run 100").unwrap();
        engine.close().unwrap();

        assert_eq!(
            received(&dir),
            vec![
                "include in.drum",
                "echo screen",
                "# drumsweep sync 1",
                "run 100",
                "# drumsweep sync 2",
            ]
        );
    }

    #[test]
    fn rejected_command_carries_engine_error_line() {
        let (dir, config) = fake_engine(0);
        let mut engine = LammpsProcess::launch(&config).unwrap();

        engine.command("run 1").unwrap();
        let err = engine.command("bogus 1 2").unwrap_err();
        match err {
            EngineError::Rejected { command, reason } => {
                assert_eq!(command, "bogus 1 2");
                assert_eq!(reason, "ERROR: Unknown command: bogus 1 2");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(engine.command("run 1"), Err(EngineError::Closed)));
        assert_eq!(received(&dir).last().map(String::as_str), Some("bogus 1 2"));
    }

    #[test]
    fn missing_input_script_is_reported_before_sending() {
        let (dir, config) = fake_engine(0);
        let mut engine = LammpsProcess::launch(&config).unwrap();

        let err = engine.file(Path::new("in.missing")).unwrap_err();
        match err {
            EngineError::ScriptNotFound { path } => {
                assert_eq!(path, dir.path().join("in.missing"));
            }
            other => panic!("unexpected error: {other}"),
        }
        engine.close().unwrap();
        assert!(received(&dir).is_empty());
    }

    #[test]
    fn nonzero_exit_at_shutdown_is_an_error() {
        let (_dir, config) = fake_engine(3);
        let mut engine = LammpsProcess::launch(&config).unwrap();
        engine.command("run 1").unwrap();

        let err = engine.close().unwrap_err();
        match err {
            EngineError::Shutdown { status } => assert_eq!(status.code(), Some(3)),
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(engine.close(), Err(EngineError::Closed)));
    }

    #[test]
    fn non_utf8_engine_output_does_not_break_the_session() {
        let (dir, config) = fake_engine(0);
        let mut engine = LammpsProcess::launch(&config).unwrap();

        engine.command("run 10").unwrap();
        engine.command("run 20").unwrap();
        engine.close().unwrap();

        assert_eq!(
            received(&dir),
            vec!["run 10", "# drumsweep sync 1", "run 20", "# drumsweep sync 2"]
        );
    }

    #[test]
    fn input_script_that_disables_echo_does_not_stall_the_session() {
        let (dir, config) = fake_engine(0);
        fs::write(
            dir.path().join("in.drum"),
            "units si\necho none\natom_style sphere\n",
        )
        .unwrap();

        let mut engine = LammpsProcess::launch(&config).unwrap();
        engine.file(Path::new("in.drum")).unwrap();
        engine.command("run 1").unwrap();
        engine.close().unwrap();

        assert_eq!(
            received(&dir),
            vec![
                "include in.drum",
                "echo screen",
                "# drumsweep sync 1",
                "run 1",
                "# drumsweep sync 2",
            ]
        );
    }

    #[test]
    fn missing_executable_fails_to_launch() {
        let config = LaunchConfig {
            executable: PathBuf::from("definitely-not-an-lmp-binary"),
            ..LaunchConfig::default()
        };
        let err = LammpsProcess::launch(&config).err().unwrap();
        assert!(matches!(err, EngineError::Launch { .. }));
    }
}
