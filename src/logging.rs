//! Logging setup (spec's ambient stack), following `biomedgps::init_logger`:
//! a single `log4rs` console appender with a tag-prefixed pattern, wired to
//! the `log` facade the rest of the crate logs through.

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;

/// Initialize a console logger tagged `tag_name`, at `level`. Safe to call
/// more than once per process only in tests, where the returned error from a
/// second `log4rs::init_config` is ignored.
pub fn init_logger(tag_name: &str, level: LevelFilter) -> Result<log4rs::Handle, String> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            &(format!("[{}]", tag_name) + " {d} - {h({l} - {t} - {m}{n})}"),
        )))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .logger(Logger::builder().appender("stdout").additive(false).build("stdout", level))
        .build(Root::builder().appender("stdout").build(level))
        .map_err(|e| format!("couldn't build log configuration: {}", e))?;

    log4rs::init_config(config).map_err(|e| format!("couldn't initialize log configuration: {}", e))
}
