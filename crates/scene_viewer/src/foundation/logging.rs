//! Logging utilities and structured logging support

use std::sync::Once;

pub use log::{debug, info, warn, error, trace};

static INIT: Once = Once::new();

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    INIT.call_once(env_logger::init);
}

/// Initialize the logging system with an explicit filter
///
/// `filter` follows the `env_logger` syntax (e.g. "info" or
/// "scene_viewer=debug"). When it is `None` the `RUST_LOG` variable is used,
/// then `info`. Subsequent calls are ignored.
pub fn init_with_filter(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match filter.map(str::to_owned).or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        builder.init();
        log::debug!("logging initialized");
    });
}
