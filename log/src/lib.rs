//! Logging setup for the engine workspace: file output plus optional stdout.
//!
//! Logs always go to a file (`warn` by default). Stdout logging turns on
//! when `PLAT_LOG` or `RUST_LOG` is set, or in debug builds.
//!
//! ## Environment Variables
//!
//! 1. **`PLAT_LOG`** (highest priority) - workspace-specific logging control
//! 2. **`RUST_LOG`** - standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for the workspace crates
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/plat/logs/plat-<pid>.log`
//! - macOS: `~/Library/Application Support/plat/logs/plat-12345.log`
//! - Linux: `~/.local/share/plat/logs/plat-12345.log`
//!
//! Override with `--log-file <path>` or `PLAT_LOG_FILE`.

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

const WORKSPACE_CRATES: &[&str] = &["plat", "plat_api", "plat_bin"];

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// Respects the environment variable priority described in the module docs:
/// `PLAT_LOG` > `RUST_LOG` > default settings.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program --
/// dropping it flushes and stops the background file writer.
pub fn init(config: LogConfig) -> Result<LogGuard, Box<dyn std::error::Error + Send + Sync>> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(file_filter());

    let stdout_enabled =
        env::var("PLAT_LOG").is_ok() || env::var("RUST_LOG").is_ok() || cfg!(debug_assertions);

    let stdout_layer = stdout_enabled.then(|| fmt::layer().with_filter(env_filter()));

    Registry::default()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Initialize logging for tests.
///
/// Stdout-only (no file output). Will not crash if called multiple times or
/// if logging is already initialized by another test.
pub fn test() {
    let _ = fmt().with_env_filter(env_filter()).try_init();
}

/// Split the effective log destination into directory and filename.
///
/// An explicit path with an extension names the file itself; a bare
/// directory keeps the pid-stamped default filename. `PLAT_LOG_FILE` acts
/// as the override when the caller passed none.
fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("plat-{}.log", std::process::id());
    let override_path =
        override_path.or_else(|| env::var("PLAT_LOG_FILE").ok().map(PathBuf::from));

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir.to_path_buf(), name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plat")
        .join("logs");

    (dir, filename)
}

/// File filter: follows the environment when set, otherwise stays at `warn`.
fn file_filter() -> EnvFilter {
    if env::var("PLAT_LOG").is_ok() || env::var("RUST_LOG").is_ok() {
        return env_filter();
    }
    EnvFilter::new("warn")
}

/// The effective filter: `PLAT_LOG` > `RUST_LOG` > defaults.
fn env_filter() -> EnvFilter {
    if let Ok(plat_log) = env::var("PLAT_LOG") {
        return expand_plat_log(&plat_log);
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }

    EnvFilter::new(default_directives())
}

fn default_directives() -> String {
    let crates: Vec<String> = WORKSPACE_CRATES
        .iter()
        .map(|krate| format!("{krate}=info"))
        .collect();
    format!("warn,{}", crates.join(","))
}

/// Expand `PLAT_LOG` values into full tracing filter strings.
///
/// A bare level like `PLAT_LOG=debug` becomes `warn,plat=debug,...` across
/// the workspace crates; anything with directive syntax (`=`, `:`, `,`) is
/// used as-is.
fn expand_plat_log(plat_log: &str) -> EnvFilter {
    if plat_log.contains('=') || plat_log.contains(':') || plat_log.contains(',') {
        return EnvFilter::new(plat_log);
    }

    let crates: Vec<String> = WORKSPACE_CRATES
        .iter()
        .map(|krate| format!("{krate}={plat_log}"))
        .collect();
    EnvFilter::new(format!("warn,{}", crates.join(",")))
}
