// Console logging for the content script.
//
// Records go through the `log` facade and `ConsoleLogger` prints them to the
// browser console (stderr in native test builds). Pointer moves, loop ticks
// and mutation batches fire many times per second, so those paths go
// through `debug_throttled` to keep the host page's console readable.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{Level, LevelFilter, Log, Metadata, Record};
use looper_shared::LogLevel;

static LOGGER: ConsoleLogger = ConsoleLogger;
static THROTTLE_COUNT: AtomicUsize = AtomicUsize::new(0);

const MAX_THROTTLED_PER_WINDOW: usize = 5;
const THROTTLE_WINDOW: usize = 100;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            write(record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Install the console logger at `level`.
pub fn init(level: LogLevel) {
    // Already installed on a second call; only the level changes then.
    let _ = log::set_logger(&LOGGER);
    set_level(level);
}

pub fn set_level(level: LogLevel) {
    log::set_max_level(level_filter(level));
}

pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Throttle {
    Emit,
    Announce,
    Suppress,
}

fn throttle(count: usize) -> Throttle {
    match count % THROTTLE_WINDOW {
        slot if slot < MAX_THROTTLED_PER_WINDOW => Throttle::Emit,
        MAX_THROTTLED_PER_WINDOW => Throttle::Announce,
        _ => Throttle::Suppress,
    }
}

/// Debug logging capped at 5 messages out of every 100 calls.
///
/// Takes `format_args!` so nothing is formatted while debug output is off.
pub fn debug_throttled(message: fmt::Arguments) {
    if !log::log_enabled!(Level::Debug) {
        return;
    }

    match throttle(THROTTLE_COUNT.fetch_add(1, Ordering::Relaxed)) {
        Throttle::Emit => log::debug!("{message}"),
        Throttle::Announce => {
            log::debug!("log rate limit reached, suppressing further messages...")
        }
        Throttle::Suppress => {}
    }
}

/// Route panics to `console.error` instead of the opaque wasm trap.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        log::error!("panic: {info}");
    }));
}

#[cfg(target_arch = "wasm32")]
fn write(level: Level, message: &fmt::Arguments) {
    let line = wasm_bindgen::JsValue::from_str(&format!("[looper] {message}"));
    match level {
        Level::Error => web_sys::console::error_1(&line),
        Level::Warn => web_sys::console::warn_1(&line),
        Level::Info => web_sys::console::info_1(&line),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write(level: Level, message: &fmt::Arguments) {
    eprintln!("[looper] {level}: {message}");
}
