use crate::guard::AppState;
use crate::host::{set_styles, ObserverOptions};
use crate::widget::{Context, Widget};

pub const NAME: &str = "scroll-animations";

const TARGETS: &str = ".card, .c-card, h1, h2, h3, .lead, p, .btn, .c-button";

const HIDDEN: [(&str, &str); 3] = [
    ("opacity", "0"),
    ("transform", "translateY(30px)"),
    ("transition", "opacity 0.6s ease-out, transform 0.6s ease-out"),
];
const REVEALED: [(&str, &str); 2] = [("opacity", "1"), ("transform", "translateY(0)")];

/// Fades content in the first time it scrolls into view.
pub struct ScrollReveal {
    ctx: Context,
}

impl ScrollReveal {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl Widget for ScrollReveal {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> &AppState {
        &self.ctx.state
    }

    fn mount(&mut self) -> bool {
        let host = &self.ctx.host;
        let elements = host.query_all(TARGETS);
        if elements.is_empty() {
            return false;
        }

        let reveal_host = host.clone();
        let observer = host.intersection_observer(
            ObserverOptions {
                root_margin: "0px 0px -50px 0px",
                threshold: 0.1,
            },
            Box::new(move |entries, observer| {
                for entry in entries.iter().filter(|e| e.is_intersecting) {
                    set_styles(reveal_host.as_ref(), entry.node, &REVEALED);
                    reveal_host.unobserve(observer, entry.node);
                }
            }),
        );
        for el in elements {
            set_styles(host.as_ref(), el, &HIDDEN);
            host.observe(observer, el);
        }
        true
    }
}
