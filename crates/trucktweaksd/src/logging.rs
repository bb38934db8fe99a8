// Timestamped, colorized log output

use colored::{ColoredString, Colorize};
use fern::Dispatch;
use log::{Level, LevelFilter};

pub(crate) fn format_log(message: &str) -> String {
    let now = chrono::Local::now().format("%Y.%m.%d %H:%M:%S").to_string();
    format!("[{now}] {message}")
}

/// Colors a finished log line by severity.
pub(crate) fn paint(level: Level, line: &str) -> ColoredString {
    match level {
        Level::Error => line.bright_red(),
        Level::Warn => line.bright_yellow(),
        Level::Info => line.normal(),
        Level::Debug | Level::Trace => line.dimmed(),
    }
}

/// Setup the logger.
pub(crate) fn setup(verbose: bool, no_color: bool) -> Result<(), log::SetLoggerError> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    Dispatch::new()
        .format(|out, message, record| {
            let line = format_log(&message.to_string());
            out.finish(format_args!("{}", paint(record.level(), &line)));
        })
        .level(LevelFilter::Error) // Hide enigo logs
        .level_for(env!("CARGO_CRATE_NAME"), log_level)
        .level_for("trucktweaks_input", log_level)
        .level_for("trucktweaks_settings", log_level)
        .chain(std::io::stdout())
        .apply()?;

    if no_color {
        colored::control::set_override(false);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_log_prefixes_timestamp() {
        let line = format_log("settings reloaded");
        assert!(line.starts_with('['));
        assert!(line.ends_with("] settings reloaded"));
    }

    #[test]
    fn info_lines_are_left_plain() {
        assert_eq!(paint(Level::Info, "started").to_string(), "started");
    }

    #[test]
    fn every_level_keeps_the_text() {
        for level in [Level::Error, Level::Warn, Level::Info, Level::Debug, Level::Trace] {
            assert!(paint(level, "device lost").to_string().contains("device lost"));
        }
    }
}
