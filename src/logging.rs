pub use log::LevelFilter::*;
use log::LevelFilter;

pub fn setup_logging(verbosity: LevelFilter) -> Result<(), String> {
    fern::Dispatch::new()
        .level(verbosity)
        .format(|out, message, record| out.finish(format_args!("({}) {}: {}", record.level(), record.target(), message)))
        .chain(std::io::stdout())
        .apply()
        .map_err(|e| e.to_string())
}
