use drumsweep::engine::process::DEFAULT_EXECUTABLE;

pub struct DefaultsConfig {
    pub input_script: String,
    pub steps_per_rotation: Vec<u64>,
    pub run_steps: u64,
    pub angle_variable: String,
    pub dump_id: String,
    pub dump_group: String,
    pub dump_every: u64,
    pub dump_file: String,
    pub dump_columns: Vec<String>,
    pub log_file: String,
    pub executable: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            input_script: "in.drum".to_string(),
            steps_per_rotation: vec![5000, 10000, 20000],
            run_steps: 40000,
            angle_variable: "theta".to_string(),
            dump_id: "1".to_string(),
            dump_group: "all".to_string(),
            dump_every: 100,
            dump_file: "rotating_drum.{period}.dump".to_string(),
            dump_columns: ["id", "type", "radius", "mass", "x", "y", "z"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            log_file: "log.{period}".to_string(),
            executable: DEFAULT_EXECUTABLE.to_string(),
        }
    }
}
