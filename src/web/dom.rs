//! DOM implementation of the host traits.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    ResizeObserver, Window,
};

use crate::error::ReelError;
use crate::host::{ItemBox, Stage, TrackHost};

fn host_error(context: &str, err: &JsValue) -> ReelError {
    ReelError::Host(format!("{context}: {err:?}"))
}

/// Signals raised by the observers, drained by the driver once per frame.
#[derive(Debug, Default)]
pub struct Signals {
    resized: Cell<bool>,
    visible: Cell<Option<bool>>,
}

impl Signals {
    /// Whether a resize arrived since the last call.
    pub fn take_resize(&self) -> bool {
        self.resized.replace(false)
    }

    /// Latest visibility reported since the last call.
    pub fn take_visibility(&self) -> Option<bool> {
        self.visible.take()
    }
}

/// Parse a computed `px` length such as `"12.5px"`; anything else is zero.
fn px(value: &str) -> f64 {
    value
        .trim()
        .trim_end_matches("px")
        .parse::<f64>()
        .unwrap_or(0.0)
}

/// [`TrackHost`] + [`Stage`] over real DOM elements.
pub struct DomHost {
    window: Window,
    document: Document,
    container: Option<HtmlElement>,
    wrapper: Option<HtmlElement>,
    signals: Rc<Signals>,
    resize: Option<(ResizeObserver, Closure<dyn FnMut()>)>,
    visibility: Option<(IntersectionObserver, Closure<dyn FnMut(js_sys::Array)>)>,
}

impl DomHost {
    /// Host on the global window's document.
    ///
    /// # Errors
    ///
    /// [`ReelError::Host`] outside a browser window.
    pub fn new() -> Result<Self, ReelError> {
        let window =
            web_sys::window().ok_or_else(|| ReelError::Host("no global window".to_owned()))?;
        let document = window
            .document()
            .ok_or_else(|| ReelError::Host("window has no document".to_owned()))?;
        Ok(Self {
            window,
            document,
            container: None,
            wrapper: None,
            signals: Rc::new(Signals::default()),
            resize: None,
            visibility: None,
        })
    }

    /// Shared signal slots the observers write to.
    #[must_use]
    pub fn signals(&self) -> Rc<Signals> {
        Rc::clone(&self.signals)
    }

    fn select(&self, parent: Option<&Element>, selector: &str) -> Result<Option<HtmlElement>, ReelError> {
        let found = match parent {
            Some(parent) => parent.query_selector(selector),
            None => self.document.query_selector(selector),
        }
        .map_err(|e| host_error(selector, &e))?;
        Ok(found.and_then(|el| el.dyn_into::<HtmlElement>().ok()))
    }

    fn set_style(element: Option<&HtmlElement>, property: &str, value: Option<&str>) {
        let Some(element) = element else {
            return;
        };
        let style = element.style();
        let result = match value {
            Some(value) => style.set_property(property, value),
            None => style.remove_property(property).map(|_| ()),
        };
        if let Err(err) = result {
            log::warn!("cannot set {property}: {err:?}");
        }
    }
}

impl TrackHost for DomHost {
    type Node = Element;

    fn bind(&mut self, container: &str, wrapper: Option<&str>) -> Result<(), ReelError> {
        let root = self
            .select(None, container)?
            .ok_or_else(|| ReelError::MissingContainer(container.to_owned()))?;
        let inner = match wrapper {
            Some(selector) => self
                .select(Some(&*root), selector)?
                .ok_or_else(|| ReelError::MissingWrapper(selector.to_owned()))?,
            None => root.clone(),
        };
        self.container = Some(root);
        self.wrapper = Some(inner);
        Ok(())
    }

    fn container_width(&self) -> f64 {
        self.container
            .as_ref()
            .map_or(0.0, |c| f64::from(c.offset_width()))
    }

    fn query_items(&self, selector: Option<&str>) -> Vec<Element> {
        match selector {
            Some(selector) => {
                let Some(container) = &self.container else {
                    return Vec::new();
                };
                let list = match container.query_selector_all(selector) {
                    Ok(list) => list,
                    Err(err) => {
                        log::warn!("bad item selector {selector}: {err:?}");
                        return Vec::new();
                    }
                };
                (0..list.length())
                    .filter_map(|i| list.get(i))
                    .filter_map(|node| node.dyn_into::<Element>().ok())
                    .collect()
            }
            None => {
                let Some(wrapper) = &self.wrapper else {
                    return Vec::new();
                };
                let children = wrapper.children();
                (0..children.length())
                    .filter_map(|i| children.item(i))
                    .collect()
            }
        }
    }

    fn measure(&self, node: &Element) -> ItemBox {
        let width = node
            .dyn_ref::<HtmlElement>()
            .map_or(0.0, |el| f64::from(el.offset_width()));
        let (margin_left, margin_right) = match self.window.get_computed_style(node) {
            Ok(Some(style)) => (
                px(&style.get_property_value("margin-left").unwrap_or_default()),
                px(&style.get_property_value("margin-right").unwrap_or_default()),
            ),
            _ => (0.0, 0.0),
        };
        ItemBox {
            width,
            margin_left,
            margin_right,
        }
    }

    fn clone_item(&mut self, item: &Element, class_name: &str) -> Result<Element, ReelError> {
        let copy = item
            .clone_node_with_deep(true)
            .map_err(|e| host_error("cloneNode", &e))?
            .dyn_into::<Element>()
            .map_err(|_| ReelError::Host("clone is not an element".to_owned()))?;
        copy.class_list()
            .add_1(class_name)
            .map_err(|e| host_error(class_name, &e))?;
        Ok(copy)
    }

    fn append(&mut self, nodes: &[Element]) {
        let Some(wrapper) = &self.wrapper else {
            return;
        };
        for node in nodes {
            if let Err(err) = wrapper.append_child(node) {
                log::warn!("cannot append clone: {err:?}");
            }
        }
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
    }

    fn connect_resize(&mut self) {
        let Some(container) = &self.container else {
            return;
        };
        let signals = Rc::clone(&self.signals);
        let callback = Closure::<dyn FnMut()>::new(move || signals.resized.set(true));
        match ResizeObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(container);
                self.resize = Some((observer, callback));
            }
            Err(err) => log::error!("ResizeObserver unavailable: {err:?}"),
        }
    }

    fn disconnect_resize(&mut self) {
        if let Some((observer, _callback)) = self.resize.take() {
            observer.disconnect();
        }
    }
}

impl Stage for DomHost {
    fn set_overflow_clip(&mut self, clip: bool) {
        Self::set_style(self.container.as_ref(), "overflow", clip.then_some("hidden"));
    }

    fn set_idle_hints(&mut self, idle: bool) {
        if idle {
            Self::set_style(self.container.as_ref(), "transform", None);
            Self::set_style(self.wrapper.as_ref(), "will-change", Some("auto"));
        } else {
            Self::set_style(self.container.as_ref(), "transform", Some("translateZ(0)"));
            Self::set_style(self.wrapper.as_ref(), "will-change", Some("transform"));
        }
    }

    fn set_offset(&mut self, x: f64) {
        let value = format!("translate3d({x}px, 0, 0)");
        Self::set_style(self.wrapper.as_ref(), "transform", Some(&value));
    }

    fn clear_motion(&mut self) {
        Self::set_style(self.wrapper.as_ref(), "transform", None);
        Self::set_style(self.wrapper.as_ref(), "will-change", None);
    }

    fn connect_visibility(&mut self) {
        let Some(container) = &self.container else {
            return;
        };
        let signals = Rc::clone(&self.signals);
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            if let Ok(entry) = entries.get(0).dyn_into::<IntersectionObserverEntry>() {
                signals.visible.set(Some(entry.is_intersecting()));
            }
        });
        match IntersectionObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(container);
                self.visibility = Some((observer, callback));
            }
            Err(err) => log::error!("IntersectionObserver unavailable: {err:?}"),
        }
    }

    fn disconnect_visibility(&mut self) {
        if let Some((observer, _callback)) = self.visibility.take() {
            observer.disconnect();
        }
    }

    fn scroll_position(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }
}

impl std::fmt::Debug for DomHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomHost")
            .field("bound", &self.container.is_some())
            .field("resize", &self.resize.is_some())
            .field("visibility", &self.visibility.is_some())
            .finish_non_exhaustive()
    }
}
