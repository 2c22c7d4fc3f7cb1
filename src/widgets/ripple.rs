use crate::guard::AppState;
use crate::host::{set_styles, EventKind, Target};
use crate::widget::{Context, Widget};

pub const NAME: &str = "ripple";

const TARGETS: &str = ".btn, .c-button, .nav-link";

const KEYFRAMES: &str = "@keyframes ripple { to { transform: scale(4); opacity: 0; } }";

pub struct Ripple {
    ctx: Context,
}

impl Ripple {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    fn inject_keyframes(&self) {
        let host = &self.ctx.host;
        let (Some(head), Some(style)) = (host.head(), host.create_element("style")) else {
            return;
        };
        host.set_text(style, KEYFRAMES);
        host.append_child(head, style);
    }
}

impl Widget for Ripple {
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
        let lifetime = self.ctx.config.ripple_ms;

        for el in elements {
            set_styles(host.as_ref(), el, &[("position", "relative"), ("overflow", "hidden")]);

            let click_host = host.clone();
            host.listen(
                Target::Node(el),
                EventKind::Click,
                Box::new(move |event| {
                    let Some(ripple) = click_host.create_element("span") else {
                        return;
                    };
                    let rect = click_host.rect(el);
                    let size = rect.width.max(rect.height);
                    let x = event.client_x - rect.left - size / 2.0;
                    let y = event.client_y - rect.top - size / 2.0;
                    let (size, left, top) =
                        (format!("{}px", size), format!("{}px", x), format!("{}px", y));
                    set_styles(
                        click_host.as_ref(),
                        ripple,
                        &[
                            ("width", size.as_str()),
                            ("height", size.as_str()),
                            ("left", left.as_str()),
                            ("top", top.as_str()),
                            ("position", "absolute"),
                            ("border-radius", "50%"),
                            ("background", "rgba(255, 255, 255, 0.6)"),
                            ("transform", "scale(0)"),
                            ("animation", "ripple 0.6s ease-out"),
                            ("pointer-events", "none"),
                        ],
                    );
                    click_host.append_child(el, ripple);

                    let remove_host = click_host.clone();
                    click_host.set_timeout(lifetime, Box::new(move || remove_host.remove(ripple)));
                }),
            );
        }

        self.inject_keyframes();
        true
    }
}
