use std::rc::Rc;

use log::debug;

use crate::config::Config;
use crate::guard::AppState;
use crate::host::Host;

/// What every widget is built from: the page, the shared init flags and the
/// configuration.
#[derive(Clone)]
pub struct Context {
    pub host: Rc<dyn Host>,
    pub state: AppState,
    pub config: Rc<Config>,
}

impl Context {
    pub fn new(host: Rc<dyn Host>, state: AppState, config: Config) -> Self {
        Self {
            host,
            state,
            config: Rc::new(config),
        }
    }
}

/// One self-contained page behaviour.
///
/// `mount` looks up the elements the widget needs and wires them. It must
/// return `false` without touching the page when they are missing.
pub trait Widget {
    fn name(&self) -> &'static str;

    fn state(&self) -> &AppState;

    fn mount(&mut self) -> bool;

    /// Runs `mount` the first time it is called for this widget name.
    fn init(&mut self) -> bool {
        if !self.state().try_enter(self.name()) {
            return false;
        }
        let mounted = self.mount();
        if mounted {
            debug!("{} mounted", self.name());
        } else {
            debug!("{}: required elements missing", self.name());
        }
        mounted
    }
}
