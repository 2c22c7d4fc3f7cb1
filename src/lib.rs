//! Progressive-enhancement behaviors for a static multi-page site: navigation
//! menu, scroll effects, contact-form validation, toasts and small visual
//! touches. Everything talks to the page through [`host::Host`], so the whole
//! crate runs natively against an in-memory DOM in tests.

pub mod config;
pub mod error;
pub mod guard;
pub mod host;
pub mod orchestrator;
pub mod rate_limit;
pub mod validation;
pub mod widget;
pub mod widgets {
    pub mod accordion;
    pub mod count_up;
    pub mod form_validation;
    pub mod image_reveal;
    pub mod menu;
    pub mod micro_interactions;
    pub mod notifications;
    pub mod privacy_popup;
    pub mod ripple;
    pub mod scroll_reveal;
    pub mod scroll_spy;
    pub mod scroll_to_top;
    pub mod smooth_scroll;
}

pub use config::Config;
pub use error::Error;
pub use guard::AppState;
pub use orchestrator::Orchestrator;

#[cfg(target_arch = "wasm32")]
mod entry {
    use std::rc::Rc;

    use log::{error, info};
    use wasm_bindgen::prelude::*;

    use crate::config::{self, Config};
    use crate::guard::AppState;
    use crate::host::web::WebHost;
    use crate::host::Host;
    use crate::orchestrator::Orchestrator;

    thread_local! {
        static STATE: AppState = AppState::new();
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        // a second init (module re-instantiated) keeps the first logger
        let _ = console_log::init_with_level(config::log_level());
        info!("Starting site behaviors");
        boot();
    }

    /// Safe to call again from page scripts; a finished boot is a no-op.
    #[wasm_bindgen]
    pub fn boot() {
        let host = match WebHost::new() {
            Ok(host) => Rc::new(host),
            Err(e) => {
                error!("cannot boot: {}", e);
                return;
            }
        };
        let config = Config::from_host(host.as_ref());
        let host: Rc<dyn Host> = host;
        STATE.with(|state| Orchestrator::new(host, state.clone(), config).run());
    }
}
