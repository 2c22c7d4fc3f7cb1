//! Browser implementation of [`Host`] on top of `web-sys`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use js_sys::Array;
use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, MouseEvent, NodeList, ScrollBehavior,
    ScrollToOptions, Window,
};

use super::{
    Event, EventKind, Handler, Host, Intersection, IntersectionHandler, NodeId, ObserverId,
    ObserverOptions, ReadyState, Rect, Scheduler, Target, TimerId,
};
use crate::error::Error;

/// Logs a failed DOM call and turns it into `None`.
fn logged<T>(result: Result<T, JsValue>, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{}", Error::Host(format!("{}: {:?}", what, e)));
            None
        }
    }
}

/// Maps elements to [`NodeId`]s. Shared with the event and observer closures
/// so they can report targets.
///
/// Lookups go through a JS `Map` keyed by element identity. Ids are never
/// reused; a released id resolves to nothing.
#[derive(Clone)]
struct Registry(Rc<RefCell<Slots>>);

struct Slots {
    ids: js_sys::Map,
    elements: HashMap<usize, Element>,
    next: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(Slots {
            ids: js_sys::Map::new(),
            elements: HashMap::new(),
            next: 0,
        })))
    }
}

impl Registry {
    fn intern(&self, element: &Element) -> NodeId {
        let mut slots = self.0.borrow_mut();
        let key: &JsValue = element.as_ref();
        if let Some(index) = slots.ids.get(key).as_f64() {
            return NodeId(index as usize);
        }
        let index = slots.next;
        slots.next += 1;
        slots.ids.set(key, &JsValue::from_f64(index as f64));
        slots.elements.insert(index, element.clone());
        NodeId(index)
    }

    fn get(&self, node: NodeId) -> Option<Element> {
        self.0.borrow().elements.get(&node.0).cloned()
    }

    fn release(&self, element: &Element) {
        let mut slots = self.0.borrow_mut();
        let key: &JsValue = element.as_ref();
        if let Some(index) = slots.ids.get(key).as_f64() {
            slots.ids.delete(key);
            slots.elements.remove(&(index as usize));
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.0.borrow().elements.len()
    }

    fn intern_list(&self, list: NodeList) -> Vec<NodeId> {
        elements(list)
            .map(|element| self.intern(&element))
            .collect()
    }
}

fn elements(list: NodeList) -> impl Iterator<Item = Element> {
    (0..list.length())
        .filter_map(move |i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
}

enum Timer {
    Once(Timeout),
    Every(Interval),
}

pub struct WebHost {
    window: Window,
    document: Document,
    registry: Registry,
    timers: Rc<RefCell<HashMap<TimerId, Timer>>>,
    next_timer: Cell<u32>,
    observers: RefCell<Vec<Option<IntersectionObserver>>>,
}

impl WebHost {
    pub fn new() -> Result<Self, Error> {
        let window = web_sys::window().ok_or(Error::Missing("window"))?;
        let document = window.document().ok_or(Error::Missing("document"))?;
        Ok(Self {
            window,
            document,
            registry: Registry::default(),
            timers: Rc::default(),
            next_timer: Cell::new(1),
            observers: RefCell::new(Vec::new()),
        })
    }

    fn element(&self, node: NodeId) -> Option<Element> {
        self.registry.get(node)
    }

    fn html(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn timer_id(&self) -> TimerId {
        let id = TimerId(self.next_timer.get());
        self.next_timer.set(id.0.wrapping_add(1));
        id
    }

    fn observer(&self, observer: ObserverId) -> Option<IntersectionObserver> {
        self.observers.borrow().get(observer.0).cloned().flatten()
    }
}

fn convert(registry: &Registry, raw: &web_sys::Event) -> Event {
    let target = raw
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .map(|el| registry.intern(&el));
    let mut event = Event::new(target);
    if let Some(key) = raw.dyn_ref::<KeyboardEvent>() {
        event = event.with_key(&key.key());
    }
    if let Some(mouse) = raw.dyn_ref::<MouseEvent>() {
        event = event
            .with_pointer(f64::from(mouse.client_x()), f64::from(mouse.client_y()))
            .with_modifiers(mouse.ctrl_key(), mouse.meta_key());
    }
    event
}

impl Scheduler for WebHost {
    fn set_timeout(&self, ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = self.timer_id();
        let timers = self.timers.clone();
        let timeout = Timeout::new(ms, move || {
            let finished = timers.borrow_mut().remove(&id);
            callback();
            drop(finished);
        });
        self.timers.borrow_mut().insert(id, Timer::Once(timeout));
        id
    }

    fn clear_timeout(&self, timer: TimerId) {
        self.timers.borrow_mut().remove(&timer);
    }

    fn set_interval(&self, ms: u32, callback: Box<dyn FnMut()>) -> TimerId {
        let id = self.timer_id();
        let interval = Interval::new(ms, callback);
        self.timers.borrow_mut().insert(id, Timer::Every(interval));
        id
    }

    fn clear_interval(&self, timer: TimerId) {
        // dropping the gloo handle cancels it
        let removed = self.timers.borrow_mut().remove(&timer);
        if let Some(Timer::Once(_)) = removed {
            warn!("clear_interval called with a timeout handle");
        }
    }
}

impl Host for WebHost {
    fn query(&self, selector: &str) -> Option<NodeId> {
        logged(self.document.query_selector(selector), "querySelector")
            .flatten()
            .map(|el| self.registry.intern(&el))
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        logged(self.document.query_selector_all(selector), "querySelectorAll")
            .map(|list| self.registry.intern_list(list))
            .unwrap_or_default()
    }

    fn query_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        self.element(scope)
            .and_then(|el| logged(el.query_selector_all(selector), "querySelectorAll"))
            .map(|list| self.registry.intern_list(list))
            .unwrap_or_default()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document
            .get_element_by_id(id)
            .map(|el| self.registry.intern(&el))
    }

    fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
        let el = self.element(node)?;
        logged(el.closest(selector), "closest")
            .flatten()
            .map(|found| self.registry.intern(&found))
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        match (self.element(ancestor), self.element(node)) {
            (Some(ancestor), Some(node)) => {
                let node: &web_sys::Node = &node;
                ancestor.contains(Some(node))
            }
            _ => false,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node)?
            .parent_element()
            .map(|p| self.registry.intern(&p))
    }

    fn body(&self) -> Option<NodeId> {
        self.document
            .body()
            .map(|body| self.registry.intern(&body))
    }

    fn head(&self) -> Option<NodeId> {
        self.document
            .head()
            .map(|head| self.registry.intern(&head))
    }

    fn create_element(&self, tag: &str) -> Option<NodeId> {
        logged(self.document.create_element(tag), "createElement")
            .map(|el| self.registry.intern(&el))
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        if let (Some(parent), Some(child)) = (self.element(parent), self.element(child)) {
            logged(parent.append_child(&child), "appendChild");
        }
    }

    fn append_text(&self, parent: NodeId, text: &str) {
        if let Some(parent) = self.element(parent) {
            let node = self.document.create_text_node(text);
            logged(parent.append_child(&node), "appendChild");
        }
    }

    /// Detaches the element and forgets it together with every registered
    /// descendant.
    fn remove(&self, node: NodeId) {
        let Some(el) = self.element(node) else { return };
        el.remove();
        if let Some(descendants) = logged(el.query_selector_all("*"), "querySelectorAll") {
            for child in elements(descendants) {
                self.registry.release(&child);
            }
        }
        self.registry.release(&el);
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element(node) {
            logged(el.set_attribute(name, value), "setAttribute");
        }
    }

    fn remove_attr(&self, node: NodeId, name: &str) {
        if let Some(el) = self.element(node) {
            logged(el.remove_attribute(name), "removeAttribute");
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .map(|el| el.class_list().contains(class))
            .unwrap_or(false)
    }

    fn add_class(&self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            logged(el.class_list().add_1(class), "classList.add");
        }
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            logged(el.class_list().remove_1(class), "classList.remove");
        }
    }

    fn style(&self, node: NodeId, property: &str) -> String {
        self.html(node)
            .and_then(|el| logged(el.style().get_property_value(property), "getPropertyValue"))
            .unwrap_or_default()
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) {
        let Some(el) = self.html(node) else { return };
        let style = el.style();
        if value.is_empty() {
            logged(style.remove_property(property), "removeProperty");
        } else {
            logged(style.set_property(property, value), "setProperty");
        }
    }

    fn text(&self, node: NodeId) -> String {
        self.element(node)
            .and_then(|el| el.text_content())
            .unwrap_or_default()
    }

    fn set_text(&self, node: NodeId, text: &str) {
        if let Some(el) = self.element(node) {
            el.set_text_content(Some(text));
        }
    }

    fn value(&self, node: NodeId) -> String {
        let Some(el) = self.element(node) else {
            return String::new();
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            String::new()
        }
    }

    fn checked(&self, node: NodeId) -> bool {
        self.element(node)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.checked())
            .unwrap_or(false)
    }

    fn set_disabled(&self, node: NodeId, disabled: bool) {
        if disabled {
            self.set_attr(node, "disabled", "");
        } else {
            self.remove_attr(node, "disabled");
        }
    }

    fn inner_width(&self) -> f64 {
        logged(self.window.inner_width(), "innerWidth")
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_y(&self) -> f64 {
        logged(self.window.scroll_y(), "scrollY").unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64, smooth: bool) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(if smooth {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Auto
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn rect(&self, node: NodeId) -> Rect {
        self.element(node)
            .map(|el| {
                let r = el.get_bounding_client_rect();
                Rect {
                    top: r.top(),
                    left: r.left(),
                    width: r.width(),
                    height: r.height(),
                }
            })
            .unwrap_or_default()
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.html(node)
            .map(|el| f64::from(el.offset_height()))
            .unwrap_or(0.0)
    }

    fn pathname(&self) -> String {
        logged(self.window.location().pathname(), "location.pathname").unwrap_or_default()
    }

    fn navigate(&self, href: &str) {
        logged(self.window.location().set_href(href), "location.href");
    }

    fn open_popup(&self, url: &str, features: &str) {
        logged(
            self.window
                .open_with_url_and_target_and_features(url, "_blank", features),
            "window.open",
        );
    }

    fn listen(&self, target: Target, kind: EventKind, mut handler: Handler) {
        let registry = self.registry.clone();
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |raw: web_sys::Event| {
            let event = convert(&registry, &raw);
            handler(&event);
            if event.default_prevented() {
                raw.prevent_default();
            }
            if event.propagation_stopped() {
                raw.stop_propagation();
            }
        });

        let target: web_sys::EventTarget = match target {
            Target::Window => self.window.clone().into(),
            Target::Document => self.document.clone().into(),
            Target::Node(node) => match self.element(node) {
                Some(el) => el.into(),
                None => return,
            },
        };
        let options = AddEventListenerOptions::new();
        options.set_passive(matches!(kind, EventKind::Scroll | EventKind::Resize));
        let added = logged(
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind.as_str(),
                closure.as_ref().unchecked_ref(),
                &options,
            ),
            "addEventListener",
        );
        if added.is_some() {
            // listeners live as long as the page
            closure.forget();
        }
    }

    fn intersection_observer(
        &self,
        options: ObserverOptions,
        mut handler: IntersectionHandler,
    ) -> ObserverId {
        let id = ObserverId(self.observers.borrow().len());
        let registry = self.registry.clone();
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _: IntersectionObserver| {
                let batch: Vec<Intersection> = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| Intersection {
                        node: registry.intern(&entry.target()),
                        is_intersecting: entry.is_intersecting(),
                    })
                    .collect();
                handler(&batch, id);
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_root_margin(options.root_margin);
        init.set_threshold(&JsValue::from_f64(options.threshold));
        let observer = logged(
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init),
            "IntersectionObserver",
        );
        if observer.is_some() {
            callback.forget();
        }
        self.observers.borrow_mut().push(observer);
        id
    }

    fn observe(&self, observer: ObserverId, node: NodeId) {
        if let (Some(observer), Some(el)) = (self.observer(observer), self.element(node)) {
            observer.observe(&el);
        }
    }

    fn unobserve(&self, observer: ObserverId, node: NodeId) {
        if let (Some(observer), Some(el)) = (self.observer(observer), self.element(node)) {
            observer.unobserve(&el);
        }
    }

    fn ready_state(&self) -> ReadyState {
        if self.document.ready_state() == "loading" {
            ReadyState::Loading
        } else {
            ReadyState::Ready
        }
    }

    fn on_ready(&self, callback: Box<dyn FnOnce()>) {
        let closure = Closure::once(move |_: web_sys::Event| callback());
        let added = logged(
            self.document.add_event_listener_with_callback(
                "DOMContentLoaded",
                closure.as_ref().unchecked_ref(),
            ),
            "addEventListener",
        );
        if added.is_some() {
            closure.forget();
        }
    }
}
