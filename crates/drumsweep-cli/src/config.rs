mod defaults;

use crate::cli::{RunArgs, SweepArgs};
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use drumsweep::engine::config::{SweepConfig, SweepConfigBuilder};
use drumsweep::engine::process::LaunchConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSweepSection {
    #[serde(rename = "steps-per-rotation")]
    steps_per_rotation: Option<Vec<u64>>,
    #[serde(rename = "run-steps")]
    run_steps: Option<u64>,
    #[serde(rename = "angle-variable")]
    angle_variable: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputSection {
    #[serde(rename = "dump-id")]
    dump_id: Option<String>,
    #[serde(rename = "dump-group")]
    dump_group: Option<String>,
    #[serde(rename = "dump-every")]
    dump_every: Option<u64>,
    #[serde(rename = "dump-file")]
    dump_file: Option<String>,
    #[serde(rename = "dump-columns")]
    dump_columns: Option<Vec<String>>,
    #[serde(rename = "log-file")]
    log_file: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialEngineSection {
    executable: Option<PathBuf>,
    args: Option<Vec<String>>,
    #[serde(rename = "working-dir")]
    working_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    #[serde(rename = "input-script")]
    input_script: Option<PathBuf>,
    sweep: Option<PartialSweepSection>,
    output: Option<PartialOutputSection>,
    engine: Option<PartialEngineSection>,
}

/// Everything a subcommand needs once files, flags and defaults are merged.
#[derive(Debug)]
pub struct AppConfig {
    pub sweep: SweepConfig,
    pub engine: LaunchConfig,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(mut self, args: &SweepArgs) -> Result<AppConfig> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();

        let sweep_section = self.sweep.take().unwrap_or_default();
        let output_section = self.output.take().unwrap_or_default();
        let engine_section = self.engine.take().unwrap_or_default();

        let input_script = args
            .input_script
            .clone()
            .or(self.input_script)
            .unwrap_or_else(|| PathBuf::from(&defaults.input_script));
        let steps_per_rotation = args
            .steps_per_rotation
            .clone()
            .or(sweep_section.steps_per_rotation)
            .unwrap_or(defaults.steps_per_rotation);
        let run_steps = args
            .run_steps
            .or(sweep_section.run_steps)
            .unwrap_or(defaults.run_steps);
        let dump_every = args
            .dump_every
            .or(output_section.dump_every)
            .unwrap_or(defaults.dump_every);

        let sweep = SweepConfigBuilder::new()
            .input_script(input_script)
            .steps_per_rotation(steps_per_rotation)
            .run_steps(run_steps)
            .angle_variable(
                sweep_section
                    .angle_variable
                    .unwrap_or(defaults.angle_variable),
            )
            .dump_id(output_section.dump_id.unwrap_or(defaults.dump_id))
            .dump_group(output_section.dump_group.unwrap_or(defaults.dump_group))
            .dump_every(dump_every)
            .dump_file(output_section.dump_file.unwrap_or(defaults.dump_file))
            .dump_columns(
                output_section
                    .dump_columns
                    .unwrap_or(defaults.dump_columns),
            )
            .log_file(output_section.log_file.unwrap_or(defaults.log_file))
            .build()?;

        let engine = LaunchConfig {
            executable: engine_section
                .executable
                .unwrap_or_else(|| PathBuf::from(&defaults.executable)),
            args: engine_section.args.unwrap_or_default(),
            working_dir: engine_section.working_dir,
        };

        Ok(AppConfig { sweep, engine })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "input-script" => {
                    self.input_script = Some(PathBuf::from(value_str));
                }
                "sweep.steps-per-rotation" => {
                    self.sweep
                        .get_or_insert_with(Default::default)
                        .steps_per_rotation = Some(parse_list(key, value_str)?);
                }
                "sweep.run-steps" => {
                    self.sweep.get_or_insert_with(Default::default).run_steps =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "sweep.angle-variable" => {
                    self.sweep
                        .get_or_insert_with(Default::default)
                        .angle_variable = Some(value_str.to_string());
                }
                "output.dump-id" => {
                    self.output.get_or_insert_with(Default::default).dump_id =
                        Some(value_str.to_string());
                }
                "output.dump-group" => {
                    self.output.get_or_insert_with(Default::default).dump_group =
                        Some(value_str.to_string());
                }
                "output.dump-every" => {
                    self.output.get_or_insert_with(Default::default).dump_every =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "output.dump-file" => {
                    self.output.get_or_insert_with(Default::default).dump_file =
                        Some(value_str.to_string());
                }
                "output.dump-columns" => {
                    self.output
                        .get_or_insert_with(Default::default)
                        .dump_columns = Some(parse_list(key, value_str)?);
                }
                "output.log-file" => {
                    self.output.get_or_insert_with(Default::default).log_file =
                        Some(value_str.to_string());
                }
                "engine.executable" => {
                    self.engine.get_or_insert_with(Default::default).executable =
                        Some(PathBuf::from(value_str));
                }
                "engine.args" => {
                    self.engine.get_or_insert_with(Default::default).args =
                        Some(parse_list(key, value_str)?);
                }
                "engine.working-dir" => {
                    self.engine.get_or_insert_with(Default::default).working_dir =
                        Some(PathBuf::from(value_str));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

/// Comma or whitespace separated items, e.g. `5000,10000 20000`.
fn parse_list<T: FromStr>(key: &str, value_str: &str) -> Result<Vec<T>> {
    value_str
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .map(|item| parse_value(key, item, "list item"))
        .collect()
}

pub fn build_config(args: &SweepArgs) -> Result<AppConfig> {
    let partial = match &args.config {
        Some(path) => PartialConfig::from_file(path)?,
        None => PartialConfig::default(),
    };
    partial.merge_with_cli(args)
}

/// Like [`build_config`], with the engine flags of `run` taking precedence.
pub fn build_run_config(args: &RunArgs) -> Result<AppConfig> {
    let mut config = build_config(&args.sweep)?;
    if let Some(executable) = &args.executable {
        config.engine.executable = executable.clone();
    }
    if !args.engine_args.is_empty() {
        config.engine.args = args.engine_args.clone();
    }
    if let Some(dir) = &args.workdir {
        config.engine.working_dir = Some(dir.clone());
    }
    Ok(config)
}
