use crate::error::ConfigError;
use std::path::PathBuf;

const INPUT: &str = "TIMETABLE__INPUT";
const OUTPUT: &str = "TIMETABLE__OUTPUT";
const SEED: &str = "TIMETABLE__SEED";
const STRICT: &str = "TIMETABLE__STRICT";
const FAIL_ON_UNASSIGNED: &str = "TIMETABLE__FAIL_ON_UNASSIGNED";
const LOG_FORMAT: &str = "TIMETABLE__LOG__FORMAT";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Run,
    Schema,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Plain,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub command: Command,
    /// `None` reads stdin.
    pub input: Option<PathBuf>,
    /// `None` writes stdout.
    pub output: Option<PathBuf>,
    pub seed: Option<u64>,
    pub strict: bool,
    pub fail_on_unassigned: bool,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(std::env::args().skip(1), |k| std::env::var(k).ok())
    }

    /// Positional arguments win over `TIMETABLE__*` variables.
    pub fn from_sources(
        args: impl IntoIterator<Item = String>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut command = Command::Run;
        let mut input = var(INPUT).filter(|s| !s.is_empty());

        let mut args = args.into_iter();
        if let Some(first) = args.next() {
            if first == "schema" {
                command = Command::Schema;
            } else {
                input = Some(first);
            }
        }
        if let Some(extra) = args.next() {
            return Err(ConfigError::UnexpectedArg(extra));
        }

        let seed = match var(SEED) {
            Some(s) if !s.is_empty() => Some(s.trim().parse::<u64>().map_err(|_| {
                ConfigError::Invalid {
                    var: SEED,
                    expected: "an unsigned integer",
                    value: s.clone(),
                }
            })?),
            _ => None,
        };

        let log_format = match var(LOG_FORMAT).as_deref().map(str::to_ascii_lowercase) {
            None => LogFormat::default(),
            Some(s) if s == "json" => LogFormat::Json,
            Some(s) if s == "plain" => LogFormat::Plain,
            Some(s) => {
                return Err(ConfigError::Invalid {
                    var: LOG_FORMAT,
                    expected: "json or plain",
                    value: s,
                })
            }
        };

        Ok(Self {
            command,
            input: input.filter(|s| s != "-").map(PathBuf::from),
            output: var(OUTPUT).filter(|s| !s.is_empty()).map(PathBuf::from),
            seed,
            strict: flag(&var, STRICT)?,
            fail_on_unassigned: flag(&var, FAIL_ON_UNASSIGNED)?,
            log_format,
        })
    }
}

fn flag(var: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<bool, ConfigError> {
    let Some(raw) = var(name) else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigError::Invalid {
            var: name,
            expected: "a boolean",
            value: raw,
        }),
    }
}
