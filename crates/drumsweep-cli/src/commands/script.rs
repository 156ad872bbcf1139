use crate::cli::ScriptArgs;
use crate::config;
use crate::error::{CliError, Result};
use drumsweep::engine::progress::ProgressReporter;
use drumsweep::engine::script::ScriptWriter;
use drumsweep::workflows;
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

pub fn run(args: ScriptArgs) -> Result<()> {
    let app_config = config::build_config(&args.sweep)?;

    if args.output.exists() && !args.force {
        return Err(CliError::Argument(format!(
            "Output file {} already exists. Use --force to overwrite.",
            args.output.display()
        )));
    }

    let header = format!(
        "Rotating drum sweep generated by drumsweep v{}\nRun with: lmp -in {}",
        env!("CARGO_PKG_VERSION"),
        args.output.display()
    );
    let file = File::create(&args.output)?;
    let mut writer = ScriptWriter::new(BufWriter::new(file), &header)?;

    info!("Writing sweep input script to {:?}", &args.output);
    let report =
        workflows::sweep::run(&mut writer, &app_config.sweep, &ProgressReporter::new())?;
    let lines = writer.lines_written();
    writer.into_inner()?;

    println!(
        "✓ Wrote {} command(s) for {} rotation period(s) to {}",
        lines,
        report.runs.len(),
        args.output.display()
    );
    Ok(())
}
