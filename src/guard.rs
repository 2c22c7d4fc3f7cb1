use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use log::debug;

#[derive(Debug, Default)]
struct Flags {
    widgets: HashSet<&'static str>,
    app_initialized: bool,
}

/// The one-shot initialisation registry shared by the orchestrator and every
/// widget. Cloning hands out another handle to the same flags.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    flags: Rc<RefCell<Flags>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true exactly once per name.
    pub fn try_enter(&self, name: &'static str) -> bool {
        let entered = self.flags.borrow_mut().widgets.insert(name);
        if !entered {
            debug!("{} already initialized, skipping", name);
        }
        entered
    }

    pub fn is_entered(&self, name: &str) -> bool {
        self.flags.borrow().widgets.contains(name)
    }

    pub fn app_initialized(&self) -> bool {
        self.flags.borrow().app_initialized
    }

    pub fn mark_app_initialized(&self) {
        self.flags.borrow_mut().app_initialized = true;
    }
}
