use std::rc::Rc;

use crate::guard::AppState;
use crate::host::{set_styles, EventKind, Host, Target};
use crate::rate_limit::throttle;
use crate::widget::{Context, Widget};

pub const NAME: &str = "scroll-to-top";

const BUTTON_STYLE: [(&str, &str); 16] = [
    ("position", "fixed"),
    ("bottom", "20px"),
    ("right", "20px"),
    ("width", "50px"),
    ("height", "50px"),
    ("border-radius", "50%"),
    ("background", "var(--color-primary)"),
    ("color", "white"),
    ("border", "none"),
    ("font-size", "24px"),
    ("cursor", "pointer"),
    ("opacity", "0"),
    ("transform", "scale(0)"),
    ("transition", "all 0.3s ease-in-out"),
    ("z-index", "1000"),
    ("box-shadow", "var(--shadow-lg)"),
];

pub struct ScrollToTop {
    ctx: Context,
}

impl ScrollToTop {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl Widget for ScrollToTop {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> &AppState {
        &self.ctx.state
    }

    fn mount(&mut self) -> bool {
        let host: Rc<dyn Host> = self.ctx.host.clone();
        let (Some(body), Some(button)) = (host.body(), host.create_element("button")) else {
            return false;
        };
        host.set_text(button, "↑");
        host.set_attr(button, "class", "scroll-to-top");
        host.set_attr(button, "aria-label", "Nach oben scrollen");
        set_styles(host.as_ref(), button, &BUTTON_STYLE);
        host.append_child(body, button);

        let threshold = self.ctx.config.scroll_top_threshold_px;
        let scroll_host = host.clone();
        let mut on_scroll = throttle(host.clone(), self.ctx.config.scroll_throttle_ms, move |_: ()| {
            if scroll_host.scroll_y() > threshold {
                set_styles(scroll_host.as_ref(), button, &[("opacity", "1"), ("transform", "scale(1)")]);
            } else {
                set_styles(scroll_host.as_ref(), button, &[("opacity", "0"), ("transform", "scale(0)")]);
            }
        });
        host.listen(Target::Window, EventKind::Scroll, Box::new(move |_| on_scroll(())));

        let click_host = host.clone();
        host.listen(
            Target::Node(button),
            EventKind::Click,
            Box::new(move |_| click_host.scroll_to(0.0, true)),
        );
        true
    }
}
