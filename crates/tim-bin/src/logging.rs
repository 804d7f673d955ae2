//! File logging and the panic hook.
//!
//! Logs never go to the terminal: the editor owns the screen. The filter comes
//! from `TIM_LOG` (an `EnvFilter` directive string, default `warn`).

use std::path::PathBuf;
use std::sync::Once;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TIM_LOG";
pub const LOG_FILE: &str = "tim.log";

/// `<cache dir>/tim`, or the temp dir when there is no cache dir or it
/// cannot be created.
pub fn log_dir() -> PathBuf {
    if let Some(dir) = dirs::cache_dir().map(|d| d.join("tim"))
        && std::fs::create_dir_all(&dir).is_ok()
    {
        return dir;
    }
    std::env::temp_dir()
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Keep the guard alive until exit so the
/// non-blocking writer flushes.
pub fn init() -> Option<WorkerGuard> {
    let dir = log_dir();
    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .try_init()
        .ok()
        .map(|_| guard)
}

/// Log the panic, put the terminal back, then run the default hook so the
/// message lands on a usable screen.
pub fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", %info, "panic");
            core_terminal::restore_terminal();
            default_panic(info);
        }));
    });
}
