//! `log` backend writing to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

fn format_line(level: Level, target: &str, message: &str) -> String {
    format!("[{level:<5} {target}] {message}")
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), record.target(), &record.args().to_string());
        let value = JsValue::from_str(&line);
        match record.level() {
            Level::Error => web_sys::console::error_1(&value),
            Level::Warn => web_sys::console::warn_1(&value),
            Level::Info => web_sys::console::info_1(&value),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger. Later calls only adjust the level.
pub fn init(level: LevelFilter) {
    // set_logger fails once a logger is installed; the level still applies.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
