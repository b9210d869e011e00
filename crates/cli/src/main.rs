mod config;
mod error;
mod telemetry;

use anyhow::Context;
use config::{Command, Config};
use sched_core::audit::audit;
use sched_core::{validate, Solver};
use solver_greedy::GreedySolver;
use std::fs::File;
use std::io::{Read, Write};
use std::process::ExitCode;
use tracing::{error, info, warn};
use types::{ScheduleEnvelope, ScheduleOutcome};

fn main() -> anyhow::Result<ExitCode> {
    let cfg = Config::from_env()?;
    telemetry::init(cfg.log_format);

    match cfg.command {
        Command::Schema => {
            write_schema(&mut std::io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run => {
            let mut input: Box<dyn Read> = match &cfg.input {
                Some(path) => Box::new(
                    File::open(path).with_context(|| format!("reading {}", path.display()))?,
                ),
                None => Box::new(std::io::stdin().lock()),
            };
            // Buffered so a failed run never truncates the output file.
            let mut buf = Vec::new();
            let code = run(&cfg, &mut input, &mut buf)?;
            match &cfg.output {
                Some(path) => std::fs::write(path, &buf)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => std::io::stdout()
                    .lock()
                    .write_all(&buf)
                    .context("writing stdout")?,
            }
            Ok(code)
        }
    }
}

fn write_schema(out: &mut impl Write) -> anyhow::Result<()> {
    let schema = schemars::schema_for!(ScheduleEnvelope);
    serde_json::to_writer_pretty(&mut *out, &schema).context("serializing schema")?;
    writeln!(out).context("writing schema")?;
    Ok(())
}

/// Reads an envelope, solves it and writes the outcome JSON. Exit code 2
/// means the run succeeded but `fail_on_unassigned` caught leftovers.
fn run(cfg: &Config, input: &mut impl Read, output: &mut impl Write) -> anyhow::Result<ExitCode> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .context("reading schedule envelope")?;

    let env = load_envelope(&text, cfg)?;
    let out = GreedySolver::new().solve(&env);
    log_audit(&env, &out);

    serde_json::to_writer_pretty(&mut *output, &out).context("serializing outcome")?;
    writeln!(output).context("writing outcome")?;

    if cfg.fail_on_unassigned && !out.unassigned_ids.is_empty() {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

/// Parses the envelope, applies the seed override and runs the pre-flight
/// check. Validation issues are only fatal in strict mode.
fn load_envelope(text: &str, cfg: &Config) -> anyhow::Result<ScheduleEnvelope> {
    let mut env: ScheduleEnvelope =
        serde_json::from_str(text).context("parsing schedule envelope")?;
    if cfg.seed.is_some() {
        env.params.seed = cfg.seed;
    }
    info!(courses = env.courses.len(), seed = ?env.params.seed, "received envelope");

    if let Err(e) = validate(&env) {
        for issue in e.issues() {
            warn!(%issue, "validation");
        }
        if cfg.strict {
            return Err(e.into());
        }
    }
    Ok(env)
}

fn log_audit(env: &ScheduleEnvelope, out: &ScheduleOutcome) {
    let report = audit(env, out);
    for v in &report.violations {
        error!(kind = ?v.kind, details = %v.details, "schedule violates an invariant");
    }
    if report.overflow.is_empty() {
        info!("overflow room unused");
    } else {
        for u in &report.overflow {
            warn!(
                day = %u.day,
                hour = u.hour,
                group = %u.group_unit,
                instructor = %u.instructor,
                title = %u.title,
                "overflow room used"
            );
        }
    }
    for label in &out.unassigned {
        warn!(%label, "unassigned");
    }
}
