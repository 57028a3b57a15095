use std::sync::Mutex;

use slog::Drain;
use slog::Fuse;
use slog_async::Async;
use slog_json::Json;

pub use slog::{debug, error, info, o, trace, warn, Discard, Level, Logger};

/// Builds the root logger: JSON lines on stderr, written from a
/// background thread, dropping anything less severe than `level`. With
/// `env_logging`, records are also filtered through `RUST_LOG`.
pub fn initialize_logger(level: Level) -> Logger {
    let drain = Mutex::new(Json::default(std::io::stderr())).map(Fuse);

    #[cfg(feature = "env_logging")]
    let drain = slog_envlogger::new(drain).fuse();

    let drain = drain.filter_level(level).fuse();
    let drain = Async::new(drain).build().fuse();

    Logger::root(
        drain,
        o!("version" => info::VERSION, "revision" => info::REVISION, "build_timestamp" => info::BUILD_TIMESTAMP),
    )
}

/// A logger that drops everything, for tests.
pub fn discard() -> Logger {
    Logger::root(Discard, o!())
}
