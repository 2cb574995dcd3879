//! Logger setup.

/// Installs a `fern` logger on stdout with local timestamps.
///
/// The level applies to this crate; everything else is capped at `warn`.
pub fn init(level: log::LevelFilter) -> Result<(), String> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level.min(log::LevelFilter::Warn))
        .level_for(env!("CARGO_CRATE_NAME"), level)
        .chain(std::io::stdout())
        .apply()
        .map_err(|e| e.to_string())
}
