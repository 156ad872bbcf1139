use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self},
    prelude::*,
};

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    build_subscriber(verbosity, quiet, log_file)?
        .try_init()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))
}

fn build_subscriber(
    verbosity: u8,
    quiet: bool,
    log_file: Option<&Path>,
) -> Result<impl Subscriber + Send + Sync + 'static> {
    let level_filter = level_for(verbosity, quiet);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(CliError::Io)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_thread_ids(true)
                    .with_target(true),
            )
        }
        None => None,
    };

    Ok(tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer)
        .with(file_layer))
}

fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::PathBuf;
    use std::sync::Once;
    use tracing::{debug, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0, false), LevelFilter::WARN);
        assert_eq!(level_for(1, false), LevelFilter::INFO);
        assert_eq!(level_for(2, false), LevelFilter::DEBUG);
        assert_eq!(level_for(7, false), LevelFilter::TRACE);
        assert_eq!(level_for(3, true), LevelFilter::OFF);
    }

    #[test]
    #[serial]
    fn global_logger_can_only_be_installed_once() {
        ensure_global_logger_is_set();

        let result = setup_logging(0, false, None);
        assert!(matches!(result, Err(CliError::Other(_))));
    }

    #[test]
    #[serial]
    fn log_file_receives_engine_output_at_debug_verbosity() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("drumsweep.log");

        let subscriber = build_subscriber(2, false, Some(&log_path)).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            debug!(target: "lammps", "Loop time of 0.1 on 1 procs");
            warn!("Run with 5000 steps per rotation is slow");
        });

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("Loop time of 0.1 on 1 procs"));
        assert!(content.contains("DEBUG"));
        assert!(content.contains("lammps"));
        assert!(content.contains("ThreadId"));
        assert!(content.contains("Run with 5000 steps per rotation is slow"));
        assert!(!content.contains('\u{1b}'));
    }

    #[test]
    #[serial]
    fn log_file_filters_engine_output_at_default_verbosity() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("drumsweep.log");

        let subscriber = build_subscriber(0, false, Some(&log_path)).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            debug!(target: "lammps", "Step Temp E_pair");
            warn!("Engine emitted a warning");
        });

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(!content.contains("Step Temp E_pair"));
        assert!(content.contains("Engine emitted a warning"));
    }

    #[test]
    #[serial]
    fn invalid_log_file_path_propagates_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(&invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
