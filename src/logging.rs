//! Logger setup for native and browser builds.

use crate::config::LogLevel;

/// Install the global logger. Calling it again is harmless.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: LogLevel) {
    let result = env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .try_init();
    if result.is_ok() {
        log::debug!("📝 Logging initialized at {}", level.name());
    }
}

/// Install the console logger and the panic hook. Calling it again is harmless.
#[cfg(target_arch = "wasm32")]
pub fn init(level: LogLevel) {
    console_error_panic_hook::set_once();
    let filter = level.to_level_filter();
    let installed = filter
        .to_level()
        .is_some_and(|max| console_log::init_with_level(max).is_ok());
    log::set_max_level(filter);
    if installed {
        log::debug!("📝 Logging initialized at {}", level.name());
    }
}
