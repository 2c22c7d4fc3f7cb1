//! In-memory page used by the unit tests.
//!
//! Supports the subset of the DOM the widgets touch: compound selectors
//! (`tag`, `#id`, `.class`, `[attr]`, `[attr="v"]`, `[attr^="v"]`,
//! `[attr*="v"]`, comma lists), bubbling for the kinds that bubble in a
//! browser, intersection triggers and a virtual millisecond clock.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{
    Event, EventKind, Handler, Host, Intersection, IntersectionHandler, NodeId, ObserverId,
    ObserverOptions, ReadyState, Rect, Scheduler, Target, TimerId,
};

const TEXT_TAG: &str = "#text";

#[derive(Debug, Default)]
struct FakeNode {
    tag: String,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    value: String,
    checked: bool,
    rect: Rect,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

struct Listener {
    target: Target,
    kind: EventKind,
    handler: Rc<RefCell<Handler>>,
}

struct FakeObserver {
    options: ObserverOptions,
    handler: Rc<RefCell<IntersectionHandler>>,
    observed: Vec<NodeId>,
}

enum TimerTask {
    Once(Box<dyn FnOnce()>),
    Every(u64, Rc<RefCell<Box<dyn FnMut()>>>),
}

struct FakeTimer {
    due: u64,
    task: TimerTask,
}

pub struct FakeHost {
    nodes: RefCell<Vec<FakeNode>>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    listeners: RefCell<Vec<Listener>>,
    observers: RefCell<Vec<FakeObserver>>,
    timers: RefCell<BTreeMap<TimerId, FakeTimer>>,
    next_timer: Cell<u32>,
    now: Cell<u64>,
    width: Cell<f64>,
    scroll: Cell<f64>,
    path: RefCell<String>,
    loading: Cell<bool>,
    ready_callbacks: RefCell<Vec<Box<dyn FnOnce()>>>,
    pub scroll_calls: RefCell<Vec<(f64, bool)>>,
    pub navigations: RefCell<Vec<String>>,
    pub popups: RefCell<Vec<(String, String)>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    pub fn new() -> Self {
        let nodes = vec![
            FakeNode {
                tag: "html".into(),
                children: vec![NodeId(1), NodeId(2)],
                ..Default::default()
            },
            FakeNode {
                tag: "head".into(),
                parent: Some(NodeId(0)),
                ..Default::default()
            },
            FakeNode {
                tag: "body".into(),
                parent: Some(NodeId(0)),
                ..Default::default()
            },
        ];
        Self {
            nodes: RefCell::new(nodes),
            root: NodeId(0),
            head: NodeId(1),
            body: NodeId(2),
            listeners: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
            timers: RefCell::new(BTreeMap::new()),
            next_timer: Cell::new(1),
            now: Cell::new(0),
            width: Cell::new(1280.0),
            scroll: Cell::new(0.0),
            path: RefCell::new("/".into()),
            loading: Cell::new(false),
            ready_callbacks: RefCell::new(Vec::new()),
            scroll_calls: RefCell::new(Vec::new()),
            navigations: RefCell::new(Vec::new()),
            popups: RefCell::new(Vec::new()),
        }
    }

    pub fn body_node(&self) -> NodeId {
        self.body
    }

    /// Appends a new element under `parent` and returns it.
    pub fn add(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(FakeNode {
            tag: tag.to_ascii_lowercase(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            parent: Some(parent),
            ..Default::default()
        });
        nodes[parent.0].children.push(id);
        id
    }

    pub fn set_value(&self, node: NodeId, value: &str) {
        self.nodes.borrow_mut()[node.0].value = value.to_string();
    }

    pub fn set_checked(&self, node: NodeId, checked: bool) {
        self.nodes.borrow_mut()[node.0].checked = checked;
    }

    pub fn set_rect(&self, node: NodeId, rect: Rect) {
        self.nodes.borrow_mut()[node.0].rect = rect;
    }

    pub fn set_pathname(&self, path: &str) {
        *self.path.borrow_mut() = path.to_string();
    }

    pub fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
    }

    /// Flips the document to ready and runs the deferred callbacks.
    pub fn finish_loading(&self) {
        self.loading.set(false);
        let callbacks = std::mem::take(&mut *self.ready_callbacks.borrow_mut());
        for callback in callbacks {
            callback();
        }
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0]
            .children
            .iter()
            .copied()
            .filter(|c| self.nodes.borrow()[c.0].tag != TEXT_TAG)
            .collect()
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn observed_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .map(|o| o.observed.len())
            .sum()
    }

    pub fn observer_options(&self, observer: ObserverId) -> ObserverOptions {
        self.observers.borrow()[observer.0].options.clone()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Runs every timer due within the next `ms` milliseconds, in due order.
    pub fn advance(&self, ms: u64) {
        let until = self.now.get() + ms;
        loop {
            let next = self
                .timers
                .borrow()
                .iter()
                .filter(|(_, t)| t.due <= until)
                .min_by_key(|(id, t)| (t.due, **id))
                .map(|(id, t)| (*id, t.due));
            let Some((id, due)) = next else { break };
            self.now.set(due);

            let task = {
                let mut timers = self.timers.borrow_mut();
                let repeating = match timers.get_mut(&id) {
                    Some(FakeTimer {
                        due,
                        task: TimerTask::Every(period, callback),
                    }) => {
                        *due += *period;
                        Some((*period, callback.clone()))
                    }
                    _ => None,
                };
                match repeating {
                    Some((period, callback)) => Some(TimerTask::Every(period, callback)),
                    None => timers.remove(&id).map(|t| t.task),
                }
            };
            match task {
                Some(TimerTask::Once(callback)) => callback(),
                Some(TimerTask::Every(_, callback)) => (callback.borrow_mut())(),
                None => {}
            }
        }
        self.now.set(until);
    }

    /// Delivers an event, bubbling for the kinds that bubble in a browser.
    pub fn dispatch(&self, target: Target, kind: EventKind, event: Event) -> Event {
        let mut chain = Vec::new();
        match target {
            Target::Node(node) => {
                chain.push(Target::Node(node));
                if bubbles(kind) {
                    let mut current = self.parent(node);
                    while let Some(p) = current {
                        chain.push(Target::Node(p));
                        current = self.parent(p);
                    }
                    if self.is_attached(node) {
                        chain.push(Target::Document);
                        chain.push(Target::Window);
                    }
                }
            }
            Target::Document => {
                chain.push(Target::Document);
                if bubbles(kind) {
                    chain.push(Target::Window);
                }
            }
            Target::Window => chain.push(Target::Window),
        }

        for hop in chain {
            let handlers: Vec<_> = self
                .listeners
                .borrow()
                .iter()
                .filter(|l| l.target == hop && l.kind == kind)
                .map(|l| l.handler.clone())
                .collect();
            for handler in handlers {
                (handler.borrow_mut())(&event);
            }
            if event.propagation_stopped() {
                break;
            }
        }
        event
    }

    pub fn click(&self, node: NodeId) -> Event {
        self.dispatch(Target::Node(node), EventKind::Click, Event::new(Some(node)))
    }

    pub fn fire(&self, node: NodeId, kind: EventKind) -> Event {
        self.dispatch(Target::Node(node), kind, Event::new(Some(node)))
    }

    pub fn press_key(&self, key: &str) -> Event {
        self.dispatch(Target::Document, EventKind::KeyDown, Event::new(None).with_key(key))
    }

    pub fn scroll_window(&self, y: f64) {
        self.scroll.set(y);
        self.dispatch(Target::Window, EventKind::Scroll, Event::new(None));
    }

    pub fn resize_window(&self, width: f64) {
        self.width.set(width);
        self.dispatch(Target::Window, EventKind::Resize, Event::new(None));
    }

    /// Reports `node` to every observer watching it.
    pub fn intersect(&self, node: NodeId, is_intersecting: bool) {
        let handlers: Vec<_> = self
            .observers
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, o)| o.observed.contains(&node))
            .map(|(id, o)| (ObserverId(id), o.handler.clone()))
            .collect();
        let entry = [Intersection {
            node,
            is_intersecting,
        }];
        for (observer, handler) in handlers {
            (handler.borrow_mut())(&entry, observer);
        }
    }

    fn walk(&self, from: NodeId, out: &mut Vec<NodeId>) {
        let children = self.nodes.borrow()[from.0].children.clone();
        for child in children {
            if self.nodes.borrow()[child.0].tag == TEXT_TAG {
                continue;
            }
            out.push(child);
            self.walk(child, out);
        }
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        let nodes = self.nodes.borrow();
        let node = &nodes[node.0];
        selector
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .any(|compound| Compound::parse(compound).matches(node))
    }
}

fn bubbles(kind: EventKind) -> bool {
    matches!(
        kind,
        EventKind::Click
            | EventKind::KeyDown
            | EventKind::Input
            | EventKind::Submit
            | EventKind::MouseDown
            | EventKind::MouseUp
    )
}

enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
    Contains(String),
}

#[derive(Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, AttrOp)>,
}

impl Compound {
    fn parse(source: &str) -> Self {
        let mut compound = Compound::default();
        let mut rest = source;
        let take_ident = |s: &str| -> usize {
            s.find(|c: char| matches!(c, '.' | '#' | '['))
                .unwrap_or(s.len())
        };
        let n = take_ident(rest);
        if n > 0 {
            compound.tag = Some(rest[..n].to_ascii_lowercase());
        }
        rest = &rest[n..];
        while let Some(c) = rest.chars().next() {
            match c {
                '.' | '#' => {
                    let n = take_ident(&rest[1..]);
                    let ident = rest[1..1 + n].to_string();
                    if c == '.' {
                        compound.classes.push(ident);
                    } else {
                        compound.id = Some(ident);
                    }
                    rest = &rest[1 + n..];
                }
                '[' => {
                    let end = rest.find(']').unwrap_or(rest.len());
                    let inner = &rest[1..end];
                    compound.attrs.push(parse_attr(inner));
                    rest = rest.get(end + 1..).unwrap_or("");
                }
                _ => break,
            }
        }
        compound
    }

    fn matches(&self, node: &FakeNode) -> bool {
        if node.tag == TEXT_TAG {
            return false;
        }
        if let Some(tag) = &self.tag {
            if &node.tag != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.attrs.get("id") != Some(id) {
                return false;
            }
        }
        let classes = node.attrs.get("class").map(String::as_str).unwrap_or("");
        if !self
            .classes
            .iter()
            .all(|c| classes.split_whitespace().any(|have| have == c))
        {
            return false;
        }
        self.attrs.iter().all(|(name, op)| match (node.attrs.get(name), op) {
            (None, _) => false,
            (Some(_), AttrOp::Exists) => true,
            (Some(v), AttrOp::Equals(want)) => v == want,
            (Some(v), AttrOp::Prefix(want)) => v.starts_with(want.as_str()),
            (Some(v), AttrOp::Contains(want)) => v.contains(want.as_str()),
        })
    }
}

fn parse_attr(inner: &str) -> (String, AttrOp) {
    let unquote = |v: &str| v.trim_matches(|c| c == '"' || c == '\'').to_string();
    if let Some((name, value)) = inner.split_once("^=") {
        (name.to_string(), AttrOp::Prefix(unquote(value)))
    } else if let Some((name, value)) = inner.split_once("*=") {
        (name.to_string(), AttrOp::Contains(unquote(value)))
    } else if let Some((name, value)) = inner.split_once('=') {
        (name.to_string(), AttrOp::Equals(unquote(value)))
    } else {
        (inner.to_string(), AttrOp::Exists)
    }
}

impl Scheduler for FakeHost {
    fn set_timeout(&self, ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId(self.next_timer.get());
        self.next_timer.set(id.0 + 1);
        self.timers.borrow_mut().insert(
            id,
            FakeTimer {
                due: self.now.get() + u64::from(ms),
                task: TimerTask::Once(callback),
            },
        );
        id
    }

    fn clear_timeout(&self, timer: TimerId) {
        self.timers.borrow_mut().remove(&timer);
    }

    fn set_interval(&self, ms: u32, callback: Box<dyn FnMut()>) -> TimerId {
        let id = TimerId(self.next_timer.get());
        self.next_timer.set(id.0 + 1);
        let period = u64::from(ms.max(1));
        self.timers.borrow_mut().insert(
            id,
            FakeTimer {
                due: self.now.get() + period,
                task: TimerTask::Every(period, Rc::new(RefCell::new(callback))),
            },
        );
        id
    }

    fn clear_interval(&self, timer: TimerId) {
        self.timers.borrow_mut().remove(&timer);
    }
}

impl Host for FakeHost {
    fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.query_within(self.root, selector)
    }

    fn query_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.walk(scope, &mut all);
        all.into_iter()
            .filter(|n| self.matches(*n, selector))
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut all = Vec::new();
        self.walk(self.root, &mut all);
        all.into_iter()
            .find(|n| self.nodes.borrow()[n.0].attrs.get("id").map(String::as_str) == Some(id))
    }

    fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.matches(n, selector) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow().get(node.0).and_then(|n| n.parent)
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn head(&self) -> Option<NodeId> {
        Some(self.head)
    }

    fn create_element(&self, tag: &str) -> Option<NodeId> {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(FakeNode {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        });
        Some(NodeId(nodes.len() - 1))
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        self.remove(child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(child);
    }

    fn append_text(&self, parent: NodeId, text: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(FakeNode {
            tag: TEXT_TAG.into(),
            text: text.to_string(),
            parent: Some(parent),
            ..Default::default()
        });
        nodes[parent.0].children.push(id);
    }

    fn remove(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attrs.get(name).cloned()
    }

    fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attr(&self, node: NodeId, name: &str) {
        self.nodes.borrow_mut()[node.0].attrs.remove(name);
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .map(|c| c.split_whitespace().any(|have| have == class))
            .unwrap_or(false)
    }

    fn add_class(&self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        let joined = match self.attr(node, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr(node, "class", &joined);
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(existing) = self.attr(node, "class") {
            let kept: Vec<&str> = existing.split_whitespace().filter(|c| *c != class).collect();
            self.set_attr(node, "class", &kept.join(" "));
        }
    }

    fn style(&self, node: NodeId, property: &str) -> String {
        self.nodes.borrow()[node.0]
            .style
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        if value.is_empty() {
            nodes[node.0].style.remove(property);
        } else {
            nodes[node.0]
                .style
                .insert(property.to_string(), value.to_string());
        }
    }

    fn text(&self, node: NodeId) -> String {
        collect_text(&self.nodes.borrow(), node)
    }

    fn set_text(&self, node: NodeId, text: &str) {
        let children = std::mem::take(&mut self.nodes.borrow_mut()[node.0].children);
        let mut nodes = self.nodes.borrow_mut();
        for child in children {
            nodes[child.0].parent = None;
        }
        nodes[node.0].text = text.to_string();
    }

    fn value(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].value.clone()
    }

    fn checked(&self, node: NodeId) -> bool {
        self.nodes.borrow()[node.0].checked
    }

    fn set_disabled(&self, node: NodeId, disabled: bool) {
        if disabled {
            self.set_attr(node, "disabled", "");
        } else {
            self.remove_attr(node, "disabled");
        }
    }

    fn inner_width(&self) -> f64 {
        self.width.get()
    }

    fn scroll_y(&self) -> f64 {
        self.scroll.get()
    }

    fn scroll_to(&self, top: f64, smooth: bool) {
        self.scroll.set(top);
        self.scroll_calls.borrow_mut().push((top, smooth));
    }

    fn rect(&self, node: NodeId) -> Rect {
        self.nodes.borrow()[node.0].rect
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.nodes.borrow()[node.0].rect.height
    }

    fn pathname(&self) -> String {
        self.path.borrow().clone()
    }

    fn navigate(&self, href: &str) {
        self.navigations.borrow_mut().push(href.to_string());
    }

    fn open_popup(&self, url: &str, features: &str) {
        self.popups
            .borrow_mut()
            .push((url.to_string(), features.to_string()));
    }

    fn listen(&self, target: Target, kind: EventKind, handler: Handler) {
        self.listeners.borrow_mut().push(Listener {
            target,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
    }

    fn intersection_observer(
        &self,
        options: ObserverOptions,
        handler: IntersectionHandler,
    ) -> ObserverId {
        let mut observers = self.observers.borrow_mut();
        observers.push(FakeObserver {
            options,
            handler: Rc::new(RefCell::new(handler)),
            observed: Vec::new(),
        });
        ObserverId(observers.len() - 1)
    }

    fn observe(&self, observer: ObserverId, node: NodeId) {
        if let Some(o) = self.observers.borrow_mut().get_mut(observer.0) {
            if !o.observed.contains(&node) {
                o.observed.push(node);
            }
        }
    }

    fn unobserve(&self, observer: ObserverId, node: NodeId) {
        if let Some(o) = self.observers.borrow_mut().get_mut(observer.0) {
            o.observed.retain(|n| *n != node);
        }
    }

    fn ready_state(&self) -> ReadyState {
        if self.loading.get() {
            ReadyState::Loading
        } else {
            ReadyState::Ready
        }
    }

    fn on_ready(&self, callback: Box<dyn FnOnce()>) {
        self.ready_callbacks.borrow_mut().push(callback);
    }
}

fn collect_text(nodes: &[FakeNode], node: NodeId) -> String {
    let mut out = nodes[node.0].text.clone();
    for child in &nodes[node.0].children {
        out.push_str(&collect_text(nodes, *child));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_cover_compound_and_attribute_forms() {
        let host = FakeHost::new();
        let body = host.body_node();
        let nav = host.add(body, "nav", &[("id", "navbarNav"), ("class", "navbar-collapse")]);
        let link = host.add(nav, "a", &[("class", "nav-link active"), ("href", "#about")]);
        let privacy = host.add(body, "a", &[("href", "/privacy.html")]);

        assert_eq!(host.query("#navbarNav, .navbar-collapse"), Some(nav));
        assert_eq!(host.query_all(".nav-link[href^=\"#\"]"), vec![link]);
        assert_eq!(host.query_all("a[href*=\"privacy\"]"), vec![privacy]);
        assert_eq!(host.query_all("a"), vec![link, privacy]);
        assert_eq!(host.closest(link, "nav"), Some(nav));
        assert!(host.query("section[id]").is_none());
    }

    #[test]
    fn intervals_keep_firing_until_cleared() {
        let host = Rc::new(FakeHost::new());
        let ticks = Rc::new(Cell::new(0));
        let counter = ticks.clone();
        let id = host.set_interval(10, Box::new(move || counter.set(counter.get() + 1)));

        host.advance(35);
        assert_eq!(ticks.get(), 3);

        host.clear_interval(id);
        host.advance(100);
        assert_eq!(ticks.get(), 3);
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn stop_propagation_keeps_event_off_the_document() {
        let host = FakeHost::new();
        let button = host.add(host.body_node(), "button", &[]);
        let reached = Rc::new(Cell::new(false));
        let flag = reached.clone();
        host.listen(
            Target::Node(button),
            EventKind::Click,
            Box::new(|e| e.stop_propagation()),
        );
        host.listen(
            Target::Document,
            EventKind::Click,
            Box::new(move |_| flag.set(true)),
        );

        host.click(button);
        assert!(!reached.get());
    }
}
