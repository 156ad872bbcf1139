use crate::cli::RunArgs;
use crate::config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use drumsweep::engine::process::LammpsProcess;
use drumsweep::engine::progress::ProgressReporter;
use drumsweep::workflows;
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = config::build_run_config(&args)?;

    let mut engine = LammpsProcess::launch(&app_config.engine)?;
    info!("Engine running as process {}", engine.id());

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Starting sweep over {} rotation period(s)...",
        app_config.sweep.steps_per_rotation.len()
    );
    let report = workflows::sweep::run(&mut engine, &app_config.sweep, &reporter)?;

    info!(
        "Sweep finished: {} run(s) in {:.2?}",
        report.runs.len(),
        report.elapsed
    );
    for completed in &report.runs {
        println!(
            "✓ {:>8} steps/rotation  dump: {}  log: {}  ({:.1}s)",
            completed.steps_per_rotation,
            completed.dump_file,
            completed.log_file,
            completed.elapsed.as_secs_f64()
        );
    }

    Ok(())
}
