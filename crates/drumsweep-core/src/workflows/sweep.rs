use crate::core::commands::Command;
use crate::engine::Engine;
use crate::engine::config::SweepConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::time::{Duration, Instant};
use tracing::{info, instrument};

const DUMP_STYLE: &str = "custom";

/// The commands issued for one sweep value, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRun {
    pub steps_per_rotation: u64,
    pub dump_file: String,
    pub log_file: String,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRun {
    pub steps_per_rotation: u64,
    pub dump_file: String,
    pub log_file: String,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub runs: Vec<CompletedRun>,
    pub elapsed: Duration,
}

pub fn plan(config: &SweepConfig) -> Vec<PlannedRun> {
    config
        .steps_per_rotation
        .iter()
        .map(|&period| plan_run(config, period))
        .collect()
}

fn plan_run(config: &SweepConfig, period: u64) -> PlannedRun {
    let dump = &config.dump;
    let dump_file = dump.file.render(period);
    let log_file = config.log_file.render(period);

    let commands = vec![
        Command::Dump {
            id: dump.id.clone(),
            group: dump.group.clone(),
            style: DUMP_STYLE.to_string(),
            every: dump.every,
            file: dump_file.clone(),
            columns: dump.columns.clone(),
        },
        Command::Log {
            file: log_file.clone(),
        },
        Command::rotation_angle(&config.angle_variable, period),
        Command::Run {
            steps: config.run_steps,
        },
        Command::Undump {
            id: dump.id.clone(),
        },
    ];

    PlannedRun {
        steps_per_rotation: period,
        dump_file,
        log_file,
        commands,
    }
}

/// Executes the sweep on `engine`, stopping at the first rejected command.
///
/// The engine is closed after the last run; on failure it is left as is and
/// the caller decides what to do with the session.
#[instrument(skip_all, name = "sweep_workflow")]
pub fn run<E: Engine + ?Sized>(
    engine: &mut E,
    config: &SweepConfig,
    reporter: &ProgressReporter,
) -> Result<SweepReport, EngineError> {
    let started = Instant::now();

    // === Phase 1: Input script ===
    reporter.report(Progress::PhaseStart {
        name: "Loading input script",
    });
    info!("Executing input script {:?}", &config.input_script);
    engine.file(&config.input_script)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Sweep ===
    let planned = plan(config);
    info!(
        "Sweeping {} rotation period(s): {:?}",
        planned.len(),
        &config.steps_per_rotation
    );
    info!(
        "Dump files follow '{}', logs follow '{}'",
        config.dump.file, config.log_file
    );
    reporter.report(Progress::TaskStart {
        total_steps: planned.len() as u64,
    });

    let mut runs = Vec::with_capacity(planned.len());
    for planned_run in planned {
        let period = planned_run.steps_per_rotation;
        reporter.report(Progress::Message(format!(
            "{} steps per rotation -> {}, {}",
            period, planned_run.dump_file, planned_run.log_file
        )));
        info!("Starting run with {} steps per rotation", period);

        let run_started = Instant::now();
        for command in &planned_run.commands {
            engine
                .command(&command.to_string())
                .map_err(|source| EngineError::Sweep {
                    period,
                    source: Box::new(source),
                })?;
        }
        let elapsed = run_started.elapsed();
        info!(
            "Finished run with {} steps per rotation in {:.2?}",
            period, elapsed
        );

        runs.push(CompletedRun {
            steps_per_rotation: period,
            dump_file: planned_run.dump_file,
            log_file: planned_run.log_file,
            elapsed,
        });
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    // === Phase 3: Shutdown ===
    reporter.report(Progress::PhaseStart {
        name: "Closing engine",
    });
    engine.close()?;
    reporter.report(Progress::PhaseFinish);

    Ok(SweepReport {
        runs,
        elapsed: started.elapsed(),
    })
}
