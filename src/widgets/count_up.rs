use std::cell::Cell;
use std::rc::Rc;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::guard::AppState;
use crate::host::{Host, NodeId, ObserverOptions, TimerId};
use crate::widget::{Context, Widget};

pub const NAME: &str = "count-up";

const COUNTERS: &str = "[data-count]";

static LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid count pattern"));

/// Reads the integer a counter's attribute starts with, so `95%` counts to
/// 95 and `12.5` to 12.
fn leading_integer(raw: &str) -> Option<i64> {
    LEADING_INT
        .captures(raw)
        .and_then(|caps| caps[1].parse().ok())
}

/// Animates `[data-count]` elements from zero to their target once they are
/// half visible.
pub struct CountUp {
    ctx: Context,
}

impl CountUp {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

fn animate(host: &Rc<dyn Host>, node: NodeId, duration_ms: u32, tick_ms: u32) {
    let raw = host.attr(node, "data-count").unwrap_or_default();
    let Some(target) = leading_integer(&raw) else {
        warn!("data-count {:?} is not a number", raw);
        return;
    };
    let steps = f64::from(duration_ms) / f64::from(tick_ms.max(1));
    let increment = target as f64 / steps;
    let mut current = 0.0;

    let handle: Rc<Cell<Option<TimerId>>> = Rc::default();
    let tick_host = host.clone();
    let tick_handle = handle.clone();
    let timer = host.set_interval(
        tick_ms,
        Box::new(move || {
            current += increment;
            if current >= target as f64 {
                tick_host.set_text(node, &target.to_string());
                if let Some(timer) = tick_handle.take() {
                    tick_host.clear_interval(timer);
                }
            } else {
                tick_host.set_text(node, &(current.floor() as i64).to_string());
            }
        }),
    );
    handle.set(Some(timer));
}

impl Widget for CountUp {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> &AppState {
        &self.ctx.state
    }

    fn mount(&mut self) -> bool {
        let host = &self.ctx.host;
        let counters = host.query_all(COUNTERS);
        if counters.is_empty() {
            return false;
        }
        let duration = self.ctx.config.count_up_duration_ms;
        let tick = self.ctx.config.count_up_tick_ms;

        let count_host = host.clone();
        let observer = host.intersection_observer(
            ObserverOptions {
                root_margin: "0px",
                threshold: 0.5,
            },
            Box::new(move |entries, observer| {
                for entry in entries.iter().filter(|e| e.is_intersecting) {
                    animate(&count_host, entry.node, duration, tick);
                    count_host.unobserve(observer, entry.node);
                }
            }),
        );
        for counter in counters {
            host.observe(observer, counter);
        }
        true
    }
}
