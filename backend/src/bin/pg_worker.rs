//! Privilege-dropping helper for the embedded PostgreSQL test cluster.
//!
//! When the test suite runs as root, `pg_embedded_setup_unpriv` re-executes
//! this binary as an unprivileged user to drive `postgresql_embedded`. It is
//! called as `pg_worker <setup|start|stop> <payload.json>`.

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Report, Result, eyre};
use pg_embedded_setup_unpriv::worker::WorkerPayload;
use postgresql_embedded::PostgreSQL;
use tokio::runtime::Builder;

fn main() -> Result<()> {
    color_eyre::install()?;
    let (step, payload_path) = parse_args(env::args_os())?;
    let payload = read_payload(&payload_path)?;
    run(step, payload)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Setup,
    Start,
    Stop,
}

impl Step {
    fn from_arg(raw: &OsString) -> Result<Self> {
        match raw.to_string_lossy().as_ref() {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(eyre!("unknown worker step '{other}'; expected setup, start or stop")),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        })
    }
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<(Step, PathBuf)> {
    let _program = args.next();
    let step = args.next().ok_or_else(|| eyre!("missing worker step"))?;
    let step = Step::from_arg(&step)?;
    let payload = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| eyre!("missing payload path"))?;
    if let Some(extra) = args.next() {
        return Err(eyre!("unexpected argument '{}'", extra.to_string_lossy()));
    }
    Ok((step, payload))
}

fn read_payload(path: &Path) -> Result<WorkerPayload> {
    let raw = fs::read(path).with_context(|| format!("reading worker payload {path:?}"))?;
    serde_json::from_slice(&raw).with_context(|| format!("parsing worker payload {path:?}"))
}

fn run(step: Step, payload: WorkerPayload) -> Result<()> {
    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| Report::new(err).wrap_err("rebuilding postgres settings"))?;
    for (key, value) in payload.environment {
        // SAFETY: the worker is single-threaded until the runtime below starts.
        match value {
            Some(value) => unsafe { env::set_var(&key, value.expose()) },
            None => unsafe { env::remove_var(&key) },
        }
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("building worker runtime")?;
    let mut postgres = PostgreSQL::new(settings);
    runtime
        .block_on(async move {
            match step {
                Step::Setup => postgres.setup().await,
                Step::Start => postgres.start().await,
                Step::Stop => postgres.stop().await,
            }
        })
        .with_context(|| format!("postgres {step} failed"))
}
