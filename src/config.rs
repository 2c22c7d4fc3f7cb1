use log::{warn, Level};
use serde::Deserialize;

use crate::error::Error;
use crate::host::Host;

/// Element the page may use to override the defaults below.
pub const CONFIG_SELECTOR: &str = "script#site-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Timings and thresholds used by the widgets. Every key is optional in the
/// JSON override.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub menu_breakpoint_px: f64,
    pub resize_debounce_ms: u32,
    pub header_fallback_offset_px: f64,
    pub scroll_top_threshold_px: f64,
    pub scroll_throttle_ms: u32,
    pub toast_timeout_ms: u32,
    pub toast_fade_in_ms: u32,
    pub toast_fade_out_ms: u32,
    pub submit_delay_ms: u32,
    pub redirect_delay_ms: u32,
    pub redirect_to: String,
    pub count_up_duration_ms: u32,
    pub count_up_tick_ms: u32,
    pub ripple_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            menu_breakpoint_px: 1024.0,
            resize_debounce_ms: 250,
            header_fallback_offset_px: 72.0,
            scroll_top_threshold_px: 300.0,
            scroll_throttle_ms: 100,
            toast_timeout_ms: 5000,
            toast_fade_in_ms: 10,
            toast_fade_out_ms: 300,
            submit_delay_ms: 2000,
            redirect_delay_ms: 1500,
            redirect_to: "thank_you.html".to_string(),
            count_up_duration_ms: 2000,
            count_up_tick_ms: 16,
            ripple_ms: 600,
        }
    }
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the page's override block, falling back to defaults when it is
    /// absent or malformed.
    pub fn from_host(host: &dyn Host) -> Self {
        let Some(node) = host.query(CONFIG_SELECTOR) else {
            return Self::default();
        };
        let raw = host.text(node);
        if raw.trim().is_empty() {
            return Self::default();
        }
        match Self::from_json(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring site config: {}", e);
                Self::default()
            }
        }
    }
}
