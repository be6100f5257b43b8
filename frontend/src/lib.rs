//! Range looper content script
//!
//! Mounts a two-thumb range slider next to the page's `<video>` and keeps
//! playback inside the selected range while it is narrower than the media.

use std::rc::Rc;

use looper_shared::{LogLevel, LooperConfig, LooperError};

// Core modules
pub mod attachment;
pub mod mount;
pub mod platform;
pub mod session;

// Building blocks
pub mod frame;
pub mod interaction;
pub mod logging;
pub mod loop_controller;
pub mod relay;
pub mod visual;

#[cfg(test)]
mod testing;

use attachment::AttachmentWatcher;
use platform::web::WebPlatform;

const EMBEDDED_CONFIG: &str = include_str!("../looper.toml");

/// Parse the embedded settings, falling back to defaults if they are broken.
pub fn load_config() -> LooperConfig {
    LooperConfig::from_toml(EMBEDDED_CONFIG).unwrap_or_else(|error| {
        log::warn!("{error}, using default settings");
        LooperConfig::default()
    })
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen::prelude::wasm_bindgen(start))]
pub fn start() {
    logging::init(LogLevel::Info);
    logging::install_panic_hook();
    let config = load_config();
    logging::set_level(config.logging.level);

    if let Err(error) = boot(config) {
        log::error!("looper failed to start: {error}");
    }
}

fn boot(config: LooperConfig) -> Result<(), LooperError> {
    let platform = Rc::new(WebPlatform::new()?);
    let (page_mutated_relay, batches) = relay::relay::<u32>();
    let mutation_watch = platform.observe_mutations(page_mutated_relay)?;
    let watcher = AttachmentWatcher::new(platform, Rc::new(config));

    wasm_bindgen_futures::spawn_local(async move {
        let _mutation_watch = mutation_watch;
        watcher.run(batches).await;
    });
    log::debug!("looper started");
    Ok(())
}
