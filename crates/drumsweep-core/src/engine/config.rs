use crate::core::template::{PathTemplate, TemplateError};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("At least one steps-per-rotation value is required")]
    EmptySweep,

    #[error("Steps per rotation must be positive (got 0 at position {index})")]
    ZeroPeriod { index: usize },

    #[error("Steps per rotation {0} is listed more than once; its output files would be overwritten")]
    DuplicatePeriod(u64),

    #[error("'{0}' must be a positive number of steps")]
    ZeroSteps(&'static str),

    #[error("'{field}' is not a valid identifier: '{value}'")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("Invalid '{field}' template: {source}")]
    Template {
        field: &'static str,
        #[source]
        source: TemplateError,
    },

    #[error("Dump output needs at least one per-atom column")]
    NoDumpColumns,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpConfig {
    pub id: String,
    pub group: String,
    pub every: u64,
    pub file: PathTemplate,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    pub input_script: PathBuf,
    pub steps_per_rotation: Vec<u64>,
    pub run_steps: u64,
    pub angle_variable: String,
    pub dump: DumpConfig,
    pub log_file: PathTemplate,
}

#[derive(Default)]
pub struct SweepConfigBuilder {
    input_script: Option<PathBuf>,
    steps_per_rotation: Option<Vec<u64>>,
    run_steps: Option<u64>,
    angle_variable: Option<String>,
    dump_id: Option<String>,
    dump_group: Option<String>,
    dump_every: Option<u64>,
    dump_file: Option<String>,
    dump_columns: Option<Vec<String>>,
    log_file: Option<String>,
}

impl SweepConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_script(mut self, path: PathBuf) -> Self {
        self.input_script = Some(path);
        self
    }
    pub fn steps_per_rotation(mut self, periods: Vec<u64>) -> Self {
        self.steps_per_rotation = Some(periods);
        self
    }
    pub fn run_steps(mut self, steps: u64) -> Self {
        self.run_steps = Some(steps);
        self
    }
    pub fn angle_variable(mut self, name: impl Into<String>) -> Self {
        self.angle_variable = Some(name.into());
        self
    }
    pub fn dump_id(mut self, id: impl Into<String>) -> Self {
        self.dump_id = Some(id.into());
        self
    }
    pub fn dump_group(mut self, group: impl Into<String>) -> Self {
        self.dump_group = Some(group.into());
        self
    }
    pub fn dump_every(mut self, every: u64) -> Self {
        self.dump_every = Some(every);
        self
    }
    pub fn dump_file(mut self, template: impl Into<String>) -> Self {
        self.dump_file = Some(template.into());
        self
    }
    pub fn dump_columns(mut self, columns: Vec<String>) -> Self {
        self.dump_columns = Some(columns);
        self
    }
    pub fn log_file(mut self, template: impl Into<String>) -> Self {
        self.log_file = Some(template.into());
        self
    }

    pub fn build(self) -> Result<SweepConfig, ConfigError> {
        let steps_per_rotation = self
            .steps_per_rotation
            .ok_or(ConfigError::MissingParameter("steps_per_rotation"))?;
        validate_periods(&steps_per_rotation)?;

        let run_steps = self
            .run_steps
            .ok_or(ConfigError::MissingParameter("run_steps"))?;
        if run_steps == 0 {
            return Err(ConfigError::ZeroSteps("run_steps"));
        }

        let every = self
            .dump_every
            .ok_or(ConfigError::MissingParameter("dump_every"))?;
        if every == 0 {
            return Err(ConfigError::ZeroSteps("dump_every"));
        }

        let columns = self
            .dump_columns
            .ok_or(ConfigError::MissingParameter("dump_columns"))?;
        if columns.is_empty() {
            return Err(ConfigError::NoDumpColumns);
        }
        for column in &columns {
            validate_identifier("dump_columns", column)?;
        }

        let dump = DumpConfig {
            id: identifier("dump_id", self.dump_id)?,
            group: identifier("dump_group", self.dump_group)?,
            every,
            file: template("dump_file", self.dump_file)?,
            columns,
        };

        Ok(SweepConfig {
            input_script: self
                .input_script
                .ok_or(ConfigError::MissingParameter("input_script"))?,
            steps_per_rotation,
            run_steps,
            angle_variable: identifier("angle_variable", self.angle_variable)?,
            dump,
            log_file: template("log_file", self.log_file)?,
        })
    }
}

fn validate_periods(periods: &[u64]) -> Result<(), ConfigError> {
    if periods.is_empty() {
        return Err(ConfigError::EmptySweep);
    }
    let mut seen = HashSet::with_capacity(periods.len());
    for (index, &period) in periods.iter().enumerate() {
        if period == 0 {
            return Err(ConfigError::ZeroPeriod { index });
        }
        if !seen.insert(period) {
            return Err(ConfigError::DuplicatePeriod(period));
        }
    }
    Ok(())
}

fn validate_identifier(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidIdentifier {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn identifier(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    let value = value.ok_or(ConfigError::MissingParameter(field))?;
    validate_identifier(field, &value)?;
    Ok(value)
}

fn template(field: &'static str, value: Option<String>) -> Result<PathTemplate, ConfigError> {
    let value = value.ok_or(ConfigError::MissingParameter(field))?;
    PathTemplate::parse(value).map_err(|source| ConfigError::Template { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder() -> SweepConfigBuilder {
        SweepConfigBuilder::new()
            .input_script(PathBuf::from("in.drum"))
            .steps_per_rotation(vec![5000, 10000, 20000])
            .run_steps(40000)
            .angle_variable("theta")
            .dump_id("1")
            .dump_group("all")
            .dump_every(100)
            .dump_file("rotating_drum.{period}.dump")
            .dump_columns(vec!["id".to_string(), "x".to_string()])
            .log_file("log.{period}")
    }

    #[test]
    fn build_succeeds_with_all_parameters() {
        let config = complete_builder().build().unwrap();
        assert_eq!(config.steps_per_rotation, vec![5000, 10000, 20000]);
        assert_eq!(config.run_steps, 40000);
        assert_eq!(config.dump.file.render(5000), "rotating_drum.5000.dump");
        assert_eq!(config.log_file.render(20000), "log.20000");
    }

    #[test]
    fn build_reports_missing_parameter() {
        let result = SweepConfigBuilder::new()
            .steps_per_rotation(vec![1])
            .run_steps(1)
            .dump_every(1)
            .dump_columns(vec!["id".to_string()])
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("dump_id")));
    }

    #[test]
    fn empty_zero_and_duplicate_periods_are_rejected() {
        assert_eq!(
            complete_builder().steps_per_rotation(vec![]).build(),
            Err(ConfigError::EmptySweep)
        );
        assert_eq!(
            complete_builder().steps_per_rotation(vec![10, 0]).build(),
            Err(ConfigError::ZeroPeriod { index: 1 })
        );
        assert_eq!(
            complete_builder()
                .steps_per_rotation(vec![10, 20, 10])
                .build(),
            Err(ConfigError::DuplicatePeriod(10))
        );
    }

    #[test]
    fn zero_step_counts_are_rejected() {
        assert_eq!(
            complete_builder().run_steps(0).build(),
            Err(ConfigError::ZeroSteps("run_steps"))
        );
        assert_eq!(
            complete_builder().dump_every(0).build(),
            Err(ConfigError::ZeroSteps("dump_every"))
        );
    }

    #[test]
    fn templates_without_placeholder_are_rejected() {
        let result = complete_builder().log_file("log.lammps").build();
        assert!(matches!(
            result,
            Err(ConfigError::Template {
                field: "log_file",
                ..
            })
        ));
    }

    #[test]
    fn identifiers_with_whitespace_are_rejected() {
        let result = complete_builder().angle_variable("drum angle").build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidIdentifier {
                field: "angle_variable",
                ..
            })
        ));
        assert_eq!(
            complete_builder().dump_columns(vec![]).build(),
            Err(ConfigError::NoDumpColumns)
        );
    }
}
