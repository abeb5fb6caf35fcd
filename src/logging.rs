use std::io::Write;

use env_logger::WriteStyle;
use log::LevelFilter;

/// Installs an `env_logger` backend printing `[STICKSHIFT | LEVEL] message` lines.
///
/// Fails if another logger was installed first.
pub fn try_init() -> Result<(), log::SetLoggerError> {
    env_logger::builder()
        .format(|buf, record| writeln!(buf, "[STICKSHIFT | {}] {}", record.level(), record.args()))
        .write_style(WriteStyle::Always)
        .filter(None, LevelFilter::Info)
        .try_init()
}
