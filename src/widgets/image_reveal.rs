use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;

use crate::guard::AppState;
use crate::host::{set_styles, EventKind, ObserverOptions, Target};
use crate::widget::{Context, Widget};

pub const NAME: &str = "image-animations";

const PLACEHOLDER_SVG: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300">"##,
    r##"<rect width="400" height="300" fill="#f8f9fa"/>"##,
    r##"<text x="50%" y="50%" text-anchor="middle" fill="#6c757d">Image not found</text>"##,
    "</svg>"
);

/// Inline replacement for images that fail to load.
pub static PLACEHOLDER_SRC: Lazy<String> =
    Lazy::new(|| format!("data:image/svg+xml;base64,{}", STANDARD.encode(PLACEHOLDER_SVG)));

const HIDDEN: [(&str, &str); 3] = [
    ("opacity", "0"),
    ("transform", "translateY(20px)"),
    ("transition", "opacity 0.8s ease-out, transform 0.8s ease-out"),
];
const REVEALED: [(&str, &str); 2] = [("opacity", "1"), ("transform", "translateY(0)")];

pub struct ImageReveal {
    ctx: Context,
}

impl ImageReveal {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl Widget for ImageReveal {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> &AppState {
        &self.ctx.state
    }

    fn mount(&mut self) -> bool {
        let host = &self.ctx.host;
        let images = host.query_all("img");
        if images.is_empty() {
            return false;
        }

        let reveal_host = host.clone();
        let observer = host.intersection_observer(
            ObserverOptions {
                root_margin: "0px",
                threshold: 0.1,
            },
            Box::new(move |entries, observer| {
                for entry in entries.iter().filter(|e| e.is_intersecting) {
                    set_styles(reveal_host.as_ref(), entry.node, &REVEALED);
                    reveal_host.unobserve(observer, entry.node);
                }
            }),
        );

        for img in images {
            if host.attr(img, "loading").is_none() && !host.has_class(img, "c-logo__img") {
                host.set_attr(img, "loading", "lazy");
            }
            host.add_class(img, "img-fluid");
            set_styles(host.as_ref(), img, &HIDDEN);
            host.observe(observer, img);

            let error_host = host.clone();
            host.listen(
                Target::Node(img),
                EventKind::Error,
                Box::new(move |_| {
                    error_host.set_attr(img, "src", &PLACEHOLDER_SRC);
                    error_host.set_style(img, "object-fit", "contain");
                }),
            );
        }
        true
    }
}
