use std::rc::Rc;

use log::info;

use crate::config::Config;
use crate::guard::AppState;
use crate::host::{Host, ReadyState};
use crate::widget::{Context, Widget};
use crate::widgets::{
    accordion::Accordion, count_up::CountUp, form_validation::FormValidation,
    image_reveal::ImageReveal, menu::Menu, micro_interactions::MicroInteractions,
    notifications::Notifications, privacy_popup::PrivacyPopup, ripple::Ripple,
    scroll_reveal::ScrollReveal, scroll_spy::ScrollSpy, scroll_to_top::ScrollToTop,
    smooth_scroll::SmoothScroll,
};

/// Boots every widget once the document is ready.
#[derive(Clone)]
pub struct Orchestrator {
    ctx: Context,
}

impl Orchestrator {
    pub fn new(host: Rc<dyn Host>, state: AppState, config: Config) -> Self {
        Self {
            ctx: Context::new(host, state, config),
        }
    }

    /// Runs now, or on the ready signal while the document is still loading.
    /// Repeated calls after a completed boot do nothing.
    pub fn run(&self) {
        if self.ctx.state.app_initialized() {
            return;
        }
        match self.ctx.host.ready_state() {
            ReadyState::Loading => {
                let deferred = self.clone();
                self.ctx.host.on_ready(Box::new(move || deferred.boot()));
            }
            ReadyState::Ready => self.boot(),
        }
    }

    fn boot(&self) {
        if self.ctx.state.app_initialized() {
            return;
        }
        info!("initializing site behaviors");
        let mut mounted = 0;
        for mut widget in self.widgets() {
            if widget.init() {
                mounted += 1;
            }
        }
        self.ctx.state.mark_app_initialized();
        info!("site behaviors ready ({} widgets mounted)", mounted);
    }

    /// Widgets in boot order. Notifications come before form validation,
    /// which posts through them.
    fn widgets(&self) -> Vec<Box<dyn Widget>> {
        let ctx = &self.ctx;
        let notifications = Notifications::new(ctx.clone());
        let notifier = notifications.notifier();
        vec![
            Box::new(Menu::new(ctx.clone())),
            Box::new(SmoothScroll::new(ctx.clone())),
            Box::new(ScrollSpy::new(ctx.clone())),
            Box::new(ImageReveal::new(ctx.clone())),
            Box::new(notifications),
            Box::new(FormValidation::new(ctx.clone(), notifier)),
            Box::new(MicroInteractions::new(ctx.clone())),
            Box::new(Ripple::new(ctx.clone())),
            Box::new(ScrollReveal::new(ctx.clone())),
            Box::new(CountUp::new(ctx.clone())),
            Box::new(Accordion::new(ctx.clone())),
            Box::new(PrivacyPopup::new(ctx.clone())),
            Box::new(ScrollToTop::new(ctx.clone())),
        ]
    }
}
