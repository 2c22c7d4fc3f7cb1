//! The page capability every widget talks through.
//!
//! Widgets never reach for `web_sys` directly. They get an `Rc<dyn Host>` and
//! address elements by [`NodeId`] handles, which lets the same widget code run
//! against the real browser ([`web::WebHost`]) or the in-memory page used by
//! the tests.

use std::cell::Cell;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub mod fake;

/// Opaque handle for an element known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub usize);

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Window,
    Document,
    Node(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    Input,
    Blur,
    Submit,
    Scroll,
    Resize,
    MouseEnter,
    MouseLeave,
    MouseDown,
    MouseUp,
    Error,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::KeyDown => "keydown",
            EventKind::Input => "input",
            EventKind::Blur => "blur",
            EventKind::Submit => "submit",
            EventKind::Scroll => "scroll",
            EventKind::Resize => "resize",
            EventKind::MouseEnter => "mouseenter",
            EventKind::MouseLeave => "mouseleave",
            EventKind::MouseDown => "mousedown",
            EventKind::MouseUp => "mouseup",
            EventKind::Error => "error",
        }
    }
}

/// A browser event as seen by a widget handler.
///
/// `prevent_default` and `stop_propagation` only record the request; the host
/// applies them once the handler returns.
#[derive(Debug, Default)]
pub struct Event {
    pub target: Option<NodeId>,
    pub key: Option<String>,
    pub client_x: f64,
    pub client_y: f64,
    pub ctrl_key: bool,
    pub meta_key: bool,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    pub fn new(target: Option<NodeId>) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn with_pointer(mut self, x: f64, y: f64) -> Self {
        self.client_x = x;
        self.client_y = y;
        self
    }

    pub fn with_modifiers(mut self, ctrl: bool, meta: bool) -> Self {
        self.ctrl_key = ctrl;
        self.meta_key = meta;
        self
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

/// One entry delivered to an intersection handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub node: NodeId,
    pub is_intersecting: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub root_margin: &'static str,
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Ready,
}

pub type Handler = Box<dyn FnMut(&Event)>;
/// Receives the entries and the observer that produced them.
pub type IntersectionHandler = Box<dyn FnMut(&[Intersection], ObserverId)>;

/// Timer half of the host, split out so the rate limiters only need this much.
pub trait Scheduler {
    fn set_timeout(&self, ms: u32, callback: Box<dyn FnOnce()>) -> TimerId;
    fn clear_timeout(&self, timer: TimerId);
    fn set_interval(&self, ms: u32, callback: Box<dyn FnMut()>) -> TimerId;
    fn clear_interval(&self, timer: TimerId);
}

pub trait Host: Scheduler {
    // lookup
    fn query(&self, selector: &str) -> Option<NodeId>;
    fn query_all(&self, selector: &str) -> Vec<NodeId>;
    fn query_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId>;
    fn element_by_id(&self, id: &str) -> Option<NodeId>;
    fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId>;
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn body(&self) -> Option<NodeId>;
    fn head(&self) -> Option<NodeId>;

    // tree
    fn create_element(&self, tag: &str) -> Option<NodeId>;
    fn append_child(&self, parent: NodeId, child: NodeId);
    fn append_text(&self, parent: NodeId, text: &str);
    fn remove(&self, node: NodeId);

    // presentation
    fn attr(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attr(&self, node: NodeId, name: &str, value: &str);
    fn remove_attr(&self, node: NodeId, name: &str);
    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn add_class(&self, node: NodeId, class: &str);
    fn remove_class(&self, node: NodeId, class: &str);
    fn style(&self, node: NodeId, property: &str) -> String;
    fn set_style(&self, node: NodeId, property: &str, value: &str);
    fn text(&self, node: NodeId) -> String;
    fn set_text(&self, node: NodeId, text: &str);

    // form controls
    fn value(&self, node: NodeId) -> String;
    fn checked(&self, node: NodeId) -> bool;
    fn set_disabled(&self, node: NodeId, disabled: bool);

    // viewport and navigation
    fn inner_width(&self) -> f64;
    fn scroll_y(&self) -> f64;
    fn scroll_to(&self, top: f64, smooth: bool);
    fn rect(&self, node: NodeId) -> Rect;
    fn offset_height(&self, node: NodeId) -> f64;
    fn pathname(&self) -> String;
    fn navigate(&self, href: &str);
    fn open_popup(&self, url: &str, features: &str);

    // events and observers
    fn listen(&self, target: Target, kind: EventKind, handler: Handler);
    fn intersection_observer(
        &self,
        options: ObserverOptions,
        handler: IntersectionHandler,
    ) -> ObserverId;
    fn observe(&self, observer: ObserverId, node: NodeId);
    fn unobserve(&self, observer: ObserverId, node: NodeId);

    // lifecycle
    fn ready_state(&self) -> ReadyState;
    fn on_ready(&self, callback: Box<dyn FnOnce()>);
}

/// Applies a batch of inline style declarations.
pub fn set_styles(host: &dyn Host, node: NodeId, styles: &[(&str, &str)]) {
    for (property, value) in styles {
        host.set_style(node, property, value);
    }
}
