//! Logging facade
//!
//! The crate logs through `log`; firmware picks the backend. With the
//! `esp32-log` feature the `esp-println` logger can be installed here.

pub use log::{debug, error, info, trace, warn};

/// Install the `esp-println` logger at the given level
#[cfg(feature = "esp32-log")]
pub fn init(level: log::LevelFilter) {
    esp_println::logger::init_logger(level);
}
