use crate::guard::AppState;
use crate::host::{EventKind, Target};
use crate::widget::{Context, Widget};

pub const NAME: &str = "accordion";

pub struct Accordion {
    ctx: Context,
}

impl Accordion {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl Widget for Accordion {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> &AppState {
        &self.ctx.state
    }

    fn mount(&mut self) -> bool {
        let host = &self.ctx.host;
        let buttons = host.query_all(".accordion-button");
        if buttons.is_empty() {
            return false;
        }

        for button in buttons {
            let host = host.clone();
            self.ctx.host.listen(
                Target::Node(button),
                EventKind::Click,
                Box::new(move |event| {
                    event.prevent_default();
                    let Some(collapse) = host
                        .attr(button, "data-bs-target")
                        .and_then(|selector| host.query(&selector))
                    else {
                        return;
                    };
                    let expanded = host.attr(button, "aria-expanded").as_deref() == Some("true");
                    if expanded {
                        host.set_attr(button, "aria-expanded", "false");
                        host.add_class(button, "collapsed");
                        host.remove_class(collapse, "show");
                    } else {
                        host.set_attr(button, "aria-expanded", "true");
                        host.remove_class(button, "collapsed");
                        host.add_class(collapse, "show");
                    }
                }),
            );
        }
        true
    }
}
