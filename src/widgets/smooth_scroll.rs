use crate::guard::AppState;
use crate::host::{EventKind, Target};
use crate::widget::{Context, Widget};

pub const NAME: &str = "smooth-scroll";

const ANCHORS: &str = "a[href^=\"#\"]";

fn is_homepage(path: &str) -> bool {
    path == "/" || path == "/index.html"
}

pub struct SmoothScroll {
    ctx: Context,
}

impl SmoothScroll {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl Widget for SmoothScroll {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> &AppState {
        &self.ctx.state
    }

    fn mount(&mut self) -> bool {
        let host = &self.ctx.host;
        let anchors = host.query_all(ANCHORS);
        if anchors.is_empty() {
            return false;
        }
        let homepage = is_homepage(&host.pathname());
        let fallback_offset = self.ctx.config.header_fallback_offset_px;

        for anchor in anchors {
            let host = host.clone();
            self.ctx.host.listen(
                Target::Node(anchor),
                EventKind::Click,
                Box::new(move |event| {
                    let Some(href) = host.attr(anchor, "href") else {
                        return;
                    };
                    // only in-page anchors; a rewritten `/#x` is left alone
                    let Some(id) = href.strip_prefix('#') else {
                        return;
                    };
                    if id.is_empty() || id == "!" {
                        return;
                    }
                    let target = host.element_by_id(id);
                    match target {
                        Some(target) if homepage => {
                            event.prevent_default();
                            let offset = host
                                .query("header")
                                .map(|header| host.offset_height(header))
                                .unwrap_or(fallback_offset);
                            let top = host.rect(target).top + host.scroll_y() - offset;
                            host.scroll_to(top, true);
                        }
                        _ if !homepage => {
                            // section anchors only exist on the homepage
                            host.set_attr(anchor, "href", &format!("/{}", href));
                        }
                        _ => {}
                    }
                }),
            );
        }
        true
    }
}
