use crate::guard::AppState;
use crate::host::{EventKind, Target};
use crate::widget::{Context, Widget};

pub const NAME: &str = "privacy-modal";

const POPUP_FEATURES: &str = "width=800,height=600";

/// Opens privacy-policy links inside forms in a popup so a half-filled form is
/// not lost.
pub struct PrivacyPopup {
    ctx: Context,
}

impl PrivacyPopup {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl Widget for PrivacyPopup {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> &AppState {
        &self.ctx.state
    }

    fn mount(&mut self) -> bool {
        let host = &self.ctx.host;
        let links: Vec<_> = host
            .query_all("a[href*=\"privacy\"]")
            .into_iter()
            .filter(|link| host.closest(*link, "form").is_some())
            .collect();
        if links.is_empty() {
            return false;
        }

        for link in links {
            let host = host.clone();
            self.ctx.host.listen(
                Target::Node(link),
                EventKind::Click,
                Box::new(move |event| {
                    if event.ctrl_key || event.meta_key {
                        return;
                    }
                    let Some(href) = host.attr(link, "href") else {
                        return;
                    };
                    event.prevent_default();
                    host.open_popup(&href, POPUP_FEATURES);
                }),
            );
        }
        true
    }
}
