use std::rc::Rc;

use crate::guard::AppState;
use crate::host::{EventKind, Host, NodeId, Target};
use crate::widget::{Context, Widget};

pub const NAME: &str = "micro-interactions";

const TARGETS: &str = ".btn, .c-button, .card, .c-card, .nav-link, a";
const LIFTED: &str = "translateY(-2px) scale(1.02)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Button,
    Card,
    Plain,
}

fn flavor(host: &dyn Host, node: NodeId) -> Flavor {
    if host.has_class(node, "btn") || host.has_class(node, "c-button") {
        Flavor::Button
    } else if host.has_class(node, "card") || host.has_class(node, "c-card") {
        Flavor::Card
    } else {
        Flavor::Plain
    }
}

/// Hover lift and press feedback for buttons, cards and links.
pub struct MicroInteractions {
    ctx: Context,
}

impl MicroInteractions {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    fn on(&self, node: NodeId, kind: EventKind, apply: impl Fn(&dyn Host, NodeId) + 'static) {
        let host = self.ctx.host.clone();
        self.ctx.host.listen(
            Target::Node(node),
            kind,
            Box::new(move |_| apply(host.as_ref(), node)),
        );
    }
}

impl Widget for MicroInteractions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> &AppState {
        &self.ctx.state
    }

    fn mount(&mut self) -> bool {
        let host: Rc<dyn Host> = self.ctx.host.clone();
        let elements = host.query_all(TARGETS);
        if elements.is_empty() {
            return false;
        }

        for el in elements {
            host.set_style(el, "transition", "all 0.3s ease-in-out");

            self.on(el, EventKind::MouseEnter, |host, el| match flavor(host, el) {
                Flavor::Button => {
                    host.set_style(el, "transform", LIFTED);
                    host.set_style(el, "box-shadow", "var(--shadow-md)");
                }
                Flavor::Card => {
                    host.set_style(el, "transform", "translateY(-4px)");
                    host.set_style(el, "box-shadow", "var(--shadow-lg)");
                }
                Flavor::Plain => {}
            });
            self.on(el, EventKind::MouseLeave, |host, el| {
                host.set_style(el, "transform", "");
                host.set_style(el, "box-shadow", "");
            });
            self.on(el, EventKind::MouseDown, |host, el| {
                if flavor(host, el) == Flavor::Button {
                    host.set_style(el, "transform", "scale(0.98)");
                }
            });
            self.on(el, EventKind::MouseUp, |host, el| {
                if flavor(host, el) == Flavor::Button {
                    host.set_style(el, "transform", LIFTED);
                }
            });
        }
        true
    }
}
