//! Stderr logger for examples and tools built on this workspace.
//!
//! Lines look like `[  0.012s DEBUG converter] message`: targets inside this
//! workspace are shown without their crate prefix. Records from other crates
//! are shown at `WARN` and above only. Install it once at startup with
//! [`init_with_level`]; with the `tracing` feature, [`init_tracing`] installs
//! a `tracing-subscriber` instead.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, fmt::format::FmtSpan, util::SubscriberInitExt, EnvFilter};

/// Target prefixes of the crates in this workspace.
const OWN_TARGETS: [&str; 2] = ["floorplan_geo_core", "floorplan_geo"];

/// `RUST_LOG` fallback for [`init_tracing`].
#[cfg(feature = "tracing")]
const DEFAULT_DIRECTIVES: &str = "warn,floorplan_geo=info,floorplan_geo_core=info";

/// Strip a workspace crate prefix from `target`; `None` for foreign targets.
fn own_module(target: &str) -> Option<&str> {
    OWN_TARGETS.iter().find_map(|krate| {
        let rest = target.strip_prefix(*krate)?;
        if rest.is_empty() {
            Some(*krate)
        } else {
            rest.strip_prefix("::")
        }
    })
}

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let level = match own_module(metadata.target()) {
            Some(_) => self.level,
            None => self.level.min(LevelFilter::Warn),
        };
        metadata.level() <= level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let module = own_module(record.target()).unwrap_or(record.target());
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            self.started.elapsed().as_secs_f64(),
            record.level(),
            module,
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Calling this more than once is a no-op after the first successful
/// initialization.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StderrLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Without `RUST_LOG`, this workspace logs at `info` and everything else at
/// `warn`. Span close events carry timings for converter and page-box setup.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(target: &str, level: log::Level) -> Metadata<'_> {
        Metadata::builder().target(target).level(level).build()
    }

    #[test]
    fn workspace_targets_lose_their_crate_prefix() {
        assert_eq!(own_module("floorplan_geo::converter"), Some("converter"));
        assert_eq!(own_module("floorplan_geo_core::rotated_rect"), Some("rotated_rect"));
        assert_eq!(own_module("floorplan_geo"), Some("floorplan_geo"));
        assert_eq!(own_module("floorplan_geography"), None);
        assert_eq!(own_module("serde_json::de"), None);
    }

    #[test]
    fn foreign_targets_are_limited_to_warnings() {
        let logger = StderrLogger {
            level: LevelFilter::Debug,
            started: Instant::now(),
        };
        assert!(logger.enabled(&metadata("floorplan_geo::viewport", log::Level::Debug)));
        assert!(!logger.enabled(&metadata("floorplan_geo::viewport", log::Level::Trace)));
        assert!(!logger.enabled(&metadata("some_dep::module", log::Level::Info)));
        assert!(logger.enabled(&metadata("some_dep::module", log::Level::Warn)));
    }

    #[test]
    fn repeated_initialization_is_a_no_op() {
        init_with_level(LevelFilter::Debug).expect("first init");
        init_with_level(LevelFilter::Trace).expect("second init is ignored");
        assert_eq!(log::max_level(), LevelFilter::Debug);
        log::debug!("logger installed");
    }
}
