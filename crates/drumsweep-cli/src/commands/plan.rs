use crate::cli::PlanArgs;
use crate::config;
use crate::error::Result;
use drumsweep::core::commands::Command;
use drumsweep::engine::config::SweepConfig;
use drumsweep::workflows::sweep;
use std::io::{self, Write};

pub fn run(args: PlanArgs) -> Result<()> {
    let app_config = config::build_config(&args.sweep)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_plan(&mut out, &app_config.sweep)?;
    out.flush()?;
    Ok(())
}

fn write_plan(out: &mut impl Write, config: &SweepConfig) -> io::Result<()> {
    let include = Command::Include {
        path: config.input_script.to_string_lossy().into_owned(),
    };
    writeln!(out, "{}", include)?;
    for planned in sweep::plan(config) {
        writeln!(out)?;
        writeln!(out, "# {} steps per rotation", planned.steps_per_rotation)?;
        for command in &planned.commands {
            writeln!(out, "{}", command)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SweepArgs;

    #[test]
    fn plan_groups_commands_by_period() {
        let args = SweepArgs {
            steps_per_rotation: Some(vec![5000, 20000]),
            ..SweepArgs::default()
        };
        let config = config::build_config(&args).unwrap().sweep;

        let mut out = Vec::new();
        write_plan(&mut out, &config).unwrap();
        let text = String::from_utf8(out).unwrap();

        let expected = "\
include in.drum

# 5000 steps per rotation
dump 1 all custom 100 rotating_drum.5000.dump id type radius mass x y z
log log.5000
variable theta equal 2*PI*elapsed/5000
run 40000
undump 1

# 20000 steps per rotation
dump 1 all custom 100 rotating_drum.20000.dump id type radius mass x y z
log log.20000
variable theta equal 2*PI*elapsed/20000
run 40000
undump 1
";
        assert_eq!(text, expected);
    }
}
