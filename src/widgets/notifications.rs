use std::cell::Cell;
use std::rc::Rc;

use log::warn;

use crate::config::Config;
use crate::guard::AppState;
use crate::host::{set_styles, EventKind, Host, NodeId, Target};
use crate::widget::{Context, Widget};

pub const NAME: &str = "notifications";

const HIDDEN: [(&str, &str); 2] = [("opacity", "0"), ("transform", "translateY(-20px)")];
const SHOWN: [(&str, &str); 2] = [("opacity", "1"), ("transform", "translateY(0)")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Danger => "danger",
        }
    }
}

/// Handle other widgets use to post toasts. Cheap to clone.
#[derive(Clone)]
pub struct Notifier {
    host: Rc<dyn Host>,
    config: Rc<Config>,
    container: Rc<Cell<Option<NodeId>>>,
}

impl Notifier {
    pub fn show(&self, message: &str, severity: Severity) {
        let Some(container) = self.container.get() else {
            warn!("notification dropped, container not mounted: {}", message);
            return;
        };
        let host = &self.host;
        let Some(alert) = host.create_element("div") else {
            return;
        };
        host.set_attr(
            alert,
            "class",
            &format!("alert alert-{} alert-dismissible fade show", severity.as_str()),
        );
        set_styles(host.as_ref(), alert, &HIDDEN);
        host.set_style(alert, "transition", "all 0.3s ease-out");
        host.append_text(alert, message);

        if let Some(close) = host.create_element("button") {
            host.set_attr(close, "type", "button");
            host.set_attr(close, "class", "btn-close");
            host.set_attr(close, "aria-label", "Close");
            host.append_child(alert, close);

            let host_for_click = host.clone();
            let fade = self.config.toast_fade_out_ms;
            host.listen(
                Target::Node(close),
                EventKind::Click,
                Box::new(move |_| dismiss(&host_for_click, fade, alert)),
            );
        }

        host.append_child(container, alert);

        let host_for_fade = host.clone();
        host.set_timeout(
            self.config.toast_fade_in_ms,
            Box::new(move || set_styles(host_for_fade.as_ref(), alert, &SHOWN)),
        );

        let host_for_expiry = host.clone();
        let fade = self.config.toast_fade_out_ms;
        host.set_timeout(
            self.config.toast_timeout_ms,
            Box::new(move || dismiss(&host_for_expiry, fade, alert)),
        );
    }
}

fn dismiss(host: &Rc<dyn Host>, fade_ms: u32, alert: NodeId) {
    set_styles(host.as_ref(), alert, &HIDDEN);
    let host_for_removal = host.clone();
    host.set_timeout(
        fade_ms,
        Box::new(move || {
            if host_for_removal.parent(alert).is_some() {
                host_for_removal.remove(alert);
            }
        }),
    );
}

pub struct Notifications {
    ctx: Context,
    notifier: Notifier,
}

impl Notifications {
    pub fn new(ctx: Context) -> Self {
        let notifier = Notifier {
            host: ctx.host.clone(),
            config: ctx.config.clone(),
            container: Rc::default(),
        };
        Self { ctx, notifier }
    }

    pub fn notifier(&self) -> Notifier {
        self.notifier.clone()
    }
}

impl Widget for Notifications {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> &AppState {
        &self.ctx.state
    }

    fn mount(&mut self) -> bool {
        let host = &self.ctx.host;
        let Some(body) = host.body() else {
            return false;
        };
        let Some(container) = host.create_element("div") else {
            return false;
        };
        host.set_attr(container, "class", "position-fixed top-0 end-0 p-3");
        host.set_style(container, "z-index", "9999");
        host.append_child(body, container);
        self.notifier.container.set(Some(container));
        true
    }
}
