use std::cell::Cell;
use std::rc::Rc;

use crate::guard::AppState;
use crate::host::{EventKind, Host, NodeId, Target};
use crate::rate_limit::debounce;
use crate::widget::{Context, Widget};

pub const NAME: &str = "menu";

const TOGGLE: &str = ".navbar-toggler";
const COLLAPSE: &str = "#navbarNav, .navbar-collapse";

/// Collapsible navigation: `Closed` until the toggle is clicked, closed again
/// by the toggle, Escape, an outside click, a link click on narrow screens or
/// growing past the breakpoint.
struct Panel {
    host: Rc<dyn Host>,
    toggle: NodeId,
    collapse: NodeId,
    open: Cell<bool>,
}

impl Panel {
    fn open(&self) {
        self.open.set(true);
        self.host.add_class(self.collapse, "show");
        self.host
            .set_style(self.collapse, "height", "calc(100vh - var(--header-h))");
        self.host.set_attr(self.toggle, "aria-expanded", "true");
        if let Some(body) = self.host.body() {
            self.host.set_style(body, "overflow", "hidden");
        }
    }

    fn close(&self) {
        self.open.set(false);
        self.host.remove_class(self.collapse, "show");
        self.host.set_style(self.collapse, "height", "");
        self.host.set_attr(self.toggle, "aria-expanded", "false");
        if let Some(body) = self.host.body() {
            self.host.set_style(body, "overflow", "");
        }
    }

    fn toggle(&self) {
        if self.open.get() {
            self.close();
        } else {
            self.open();
        }
    }

    fn is_open(&self) -> bool {
        self.open.get()
    }
}

pub struct Menu {
    ctx: Context,
}

impl Menu {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl Widget for Menu {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> &AppState {
        &self.ctx.state
    }

    fn mount(&mut self) -> bool {
        let host = &self.ctx.host;
        let (Some(toggle), Some(collapse)) = (host.query(TOGGLE), host.query(COLLAPSE)) else {
            return false;
        };
        let panel = Rc::new(Panel {
            host: host.clone(),
            toggle,
            collapse,
            open: Cell::new(false),
        });
        let breakpoint = self.ctx.config.menu_breakpoint_px;

        let p = panel.clone();
        host.listen(
            Target::Node(toggle),
            EventKind::Click,
            Box::new(move |event| {
                event.prevent_default();
                event.stop_propagation();
                p.toggle();
            }),
        );

        let p = panel.clone();
        host.listen(
            Target::Document,
            EventKind::KeyDown,
            Box::new(move |event| {
                if event.key.as_deref() == Some("Escape") && p.is_open() {
                    p.close();
                }
            }),
        );

        let p = panel.clone();
        host.listen(
            Target::Document,
            EventKind::Click,
            Box::new(move |event| {
                if !p.is_open() {
                    return;
                }
                let inside = event
                    .target
                    .map(|t| p.host.contains(p.toggle, t) || p.host.contains(p.collapse, t))
                    .unwrap_or(false);
                if !inside {
                    p.close();
                }
            }),
        );

        for link in host.query_within(collapse, ".nav-link") {
            let p = panel.clone();
            host.listen(
                Target::Node(link),
                EventKind::Click,
                Box::new(move |_| {
                    if p.host.inner_width() < breakpoint {
                        p.close();
                    }
                }),
            );
        }

        let p = panel.clone();
        let mut on_resize = debounce(host.clone(), self.ctx.config.resize_debounce_ms, move |_: ()| {
            if p.host.inner_width() >= breakpoint && p.is_open() {
                p.close();
            }
        });
        host.listen(
            Target::Window,
            EventKind::Resize,
            Box::new(move |_| on_resize(())),
        );

        true
    }
}
