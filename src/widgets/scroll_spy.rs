use crate::guard::AppState;
use crate::host::{Host, NodeId, ObserverOptions};
use crate::widget::{Context, Widget};

pub const NAME: &str = "scroll-spy";

const SECTIONS: &str = "section[id]";
const LINKS: &str = ".nav-link[href^=\"#\"]";

/// Highlights the nav link of the section crossing the upper part of the
/// viewport.
pub struct ScrollSpy {
    ctx: Context,
}

impl ScrollSpy {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl Widget for ScrollSpy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> &AppState {
        &self.ctx.state
    }

    fn mount(&mut self) -> bool {
        let host = &self.ctx.host;
        let sections = host.query_all(SECTIONS);
        let links = host.query_all(LINKS);
        if sections.is_empty() || links.is_empty() {
            return false;
        }

        let spy_host = host.clone();
        let observer = host.intersection_observer(
            ObserverOptions {
                root_margin: "-20% 0px -70% 0px",
                threshold: 0.0,
            },
            Box::new(move |entries, _| {
                for entry in entries.iter().filter(|e| e.is_intersecting) {
                    let Some(id) = spy_host.attr(entry.node, "id") else {
                        continue;
                    };
                    highlight(spy_host.as_ref(), &links, &format!("#{}", id));
                }
            }),
        );
        for section in sections {
            host.observe(observer, section);
        }
        true
    }
}

fn highlight(host: &dyn Host, links: &[NodeId], href: &str) {
    for &link in links {
        host.remove_class(link, "active");
        if host.attr(link, "href").as_deref() == Some(href) {
            host.add_class(link, "active");
            host.set_attr(link, "aria-current", "page");
        } else {
            host.remove_attr(link, "aria-current");
        }
    }
}
