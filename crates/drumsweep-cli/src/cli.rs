use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Drumsweep Developers",
    version,
    about = "drumsweep - Sweep the rotation period of a LAMMPS rotating-drum simulation.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the sweep against a live LAMMPS process.
    Run(RunArgs),
    /// Write the sweep as a LAMMPS input script instead of running it.
    Script(ScriptArgs),
    /// Print the commands the sweep would issue, grouped by rotation period.
    Plan(PlanArgs),
}

/// Options shared by every subcommand that builds a sweep.
#[derive(Args, Debug, Clone, Default)]
pub struct SweepArgs {
    /// Input script executed once before the sweep (default: in.drum).
    #[arg(short, long, value_name = "PATH")]
    pub input_script: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Steps per drum rotation to sweep, in order (e.g. 5000,10000,20000).
    #[arg(
        short = 'p',
        long,
        value_name = "STEPS",
        value_delimiter = ',',
        num_args = 1..
    )]
    pub steps_per_rotation: Option<Vec<u64>>,

    /// Number of steps to run for every rotation period.
    #[arg(long, value_name = "STEPS")]
    pub run_steps: Option<u64>,

    /// Write a dump snapshot every this many steps.
    #[arg(long, value_name = "STEPS")]
    pub dump_every: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S sweep.run-steps=20000
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub sweep: SweepArgs,

    /// LAMMPS executable to launch (default: lmp).
    #[arg(long = "lmp", value_name = "PATH")]
    pub executable: Option<PathBuf>,

    /// Extra argument passed to the LAMMPS executable. Can be used multiple times.
    #[arg(long = "lmp-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,

    /// Directory the engine runs in; relative paths are resolved against it.
    #[arg(short, long, value_name = "PATH")]
    pub workdir: Option<PathBuf>,
}

/// Arguments for the `script` subcommand.
#[derive(Args, Debug)]
pub struct ScriptArgs {
    #[command(flatten)]
    pub sweep: SweepArgs,

    /// Path of the LAMMPS input file to write.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Overwrite the output file if it already exists.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `plan` subcommand.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub sweep: SweepArgs,
}
