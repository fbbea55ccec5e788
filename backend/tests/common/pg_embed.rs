//! Embedded PostgreSQL bootstrap for the Diesel adapter suites.
//!
//! Each bootstrap gets its own runtime and data directories under the target
//! directory unless `PG_RUNTIME_DIR` and `PG_DATA_DIR` are both set. The
//! `pg_worker` binary is offered to the library for root-owned runs.
//! Environment mutation is serialised through `env_lock`.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::TestCluster;
use uuid::Uuid;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const MAX_ATTEMPTS: u32 = 4;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

const TRANSIENT_MARKERS: [&str; 7] = [
    "connection reset",
    "connection refused",
    "timed out",
    "timeout",
    "temporarily unavailable",
    "dns error",
    "error decoding response body",
];

fn scratch_root() -> PathBuf {
    std::env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("target"))
        .join("pg-embed")
}

fn scratch_dirs() -> std::io::Result<(String, String)> {
    let base = scratch_root().join(format!("{}-{}", std::process::id(), Uuid::new_v4()));
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    std::fs::create_dir_all(&runtime_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    Ok((
        runtime_dir.to_string_lossy().into_owned(),
        data_dir.to_string_lossy().into_owned(),
    ))
}

fn is_transient(message: &str) -> bool {
    let lowered = message.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Start a fresh embedded cluster, retrying transient download failures.
pub fn test_cluster() -> Result<TestCluster, String> {
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let mut overrides: Vec<(&str, Option<String>)> = Vec::new();
    if std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none() {
        let (runtime_dir, data_dir) = scratch_dirs().map_err(|err| err.to_string())?;
        overrides.push(("PG_RUNTIME_DIR", Some(runtime_dir)));
        overrides.push(("PG_DATA_DIR", Some(data_dir)));
    }
    if std::env::var_os("PG_EMBEDDED_WORKER").is_none() {
        overrides.push((
            "PG_EMBEDDED_WORKER",
            Some(env!("CARGO_BIN_EXE_pg_worker").to_owned()),
        ));
    }
    let _env = env_lock::lock_env(overrides);

    let mut last_error = String::new();
    for attempt in 0..MAX_ATTEMPTS {
        match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => last_error = format!("{err:?}"),
        }
        if attempt + 1 == MAX_ATTEMPTS || !is_transient(&last_error) {
            break;
        }
        let delay = RETRY_BASE_DELAY * 2_u32.pow(attempt);
        eprintln!("pg-embed: transient bootstrap failure, retrying in {delay:?}: {last_error}");
        std::thread::sleep(delay);
    }
    Err(last_error)
}
