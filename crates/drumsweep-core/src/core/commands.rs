use std::fmt;

/// The kind of an engine command, used when only the verb matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Include,
    Dump,
    Log,
    Variable,
    Run,
    Undump,
}

impl CommandKind {
    pub fn verb(self) -> &'static str {
        match self {
            CommandKind::Include => "include",
            CommandKind::Dump => "dump",
            CommandKind::Log => "log",
            CommandKind::Variable => "variable",
            CommandKind::Run => "run",
            CommandKind::Undump => "undump",
        }
    }
}

/// One line of LAMMPS input issued by the sweep.
///
/// Rendering through [`fmt::Display`] produces the exact text handed to the
/// engine. Words containing whitespace or quotes are wrapped in quotes the way
/// the LAMMPS input parser expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Include {
        path: String,
    },
    Dump {
        id: String,
        group: String,
        style: String,
        every: u64,
        file: String,
        columns: Vec<String>,
    },
    Log {
        file: String,
    },
    Variable {
        name: String,
        style: String,
        expression: String,
    },
    Run {
        steps: u64,
    },
    Undump {
        id: String,
    },
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Include { .. } => CommandKind::Include,
            Command::Dump { .. } => CommandKind::Dump,
            Command::Log { .. } => CommandKind::Log,
            Command::Variable { .. } => CommandKind::Variable,
            Command::Run { .. } => CommandKind::Run,
            Command::Undump { .. } => CommandKind::Undump,
        }
    }

    /// `variable <name> equal 2*PI*elapsed/<period>`: the drum angle as a
    /// function of elapsed steps for one rotation every `period` steps.
    pub fn rotation_angle(name: &str, period: u64) -> Self {
        Command::Variable {
            name: name.to_string(),
            style: "equal".to_string(),
            expression: format!("2*PI*elapsed/{}", period),
        }
    }
}

fn quote_word(word: &str) -> String {
    if word.is_empty() {
        return "\"\"".to_string();
    }
    if !word.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        return word.to_string();
    }
    if !word.contains('"') {
        format!("\"{}\"", word)
    } else if !word.contains('\'') {
        format!("'{}'", word)
    } else {
        format!("\"\"\"{}\"\"\"", word)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().verb())?;
        match self {
            Command::Include { path } => write!(f, " {}", quote_word(path)),
            Command::Dump {
                id,
                group,
                style,
                every,
                file,
                columns,
            } => {
                write!(f, " {} {} {} {} {}", id, group, style, every, quote_word(file))?;
                for column in columns {
                    write!(f, " {}", column)?;
                }
                Ok(())
            }
            Command::Log { file } => write!(f, " {}", quote_word(file)),
            Command::Variable {
                name,
                style,
                expression,
            } => write!(f, " {} {} {}", name, style, quote_word(expression)),
            Command::Run { steps } => write!(f, " {}", steps),
            Command::Undump { id } => write!(f, " {}", id),
        }
    }
}
