//! Logging setup.

use slog::Drain;

/// Create the root logger.
///
/// Logs go to stderr through an async drain so that request handlers never
/// block on the terminal. `verbose` raises the level: 0 is info, 1 is debug,
/// and anything higher is trace.
pub fn init(verbose: u8) -> slog::Logger {
    let level = match verbose {
        0 => slog::Level::Info,
        1 => slog::Level::Debug,
        _ => slog::Level::Trace,
    };

    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = slog::LevelFilter::new(drain, level).fuse();
    slog::Logger::root(drain, slog::o!("version" => env!("GIT_VERSION")))
}
