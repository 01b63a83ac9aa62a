//! Resolution of a chosen element into an action descriptor.

use hintkit_core_types::{
    DomPort, ElementId, MouseButton, MouseEventInit, MouseEventKind, WindowId,
};
use tracing::debug;
use url::Url;

use crate::model::{ActionDescriptor, ActionKind, Category, ElementClass, OpenMode, Resource};

/// Element plus the window it was found in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Target {
    pub element: ElementId,
    pub window: WindowId,
}

const FULL_CLICK: [MouseEventKind; 4] = [
    MouseEventKind::MouseDown,
    MouseEventKind::MouseOver,
    MouseEventKind::Click,
    MouseEventKind::MouseUp,
];

/// Resolve `raw` against the document URL the way the DOM reports
/// `href`/`src` properties. Unparseable values are returned trimmed.
pub fn normalize_url(base: Option<&str>, raw: &str) -> String {
    let raw = raw.trim();
    let joined = match base.and_then(|base| Url::parse(base).ok()) {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    };
    match joined {
        Ok(url) => url.to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Normalized `src`, else `href`, of an element.
pub fn element_url(dom: &dyn DomPort, element: ElementId, window: WindowId) -> Option<String> {
    first_url(dom, element, window, ["src", "href"])
}

/// Normalized `href`, else `src`, as shown in the status readout.
pub fn link_url(dom: &dyn DomPort, element: ElementId, window: WindowId) -> Option<String> {
    first_url(dom, element, window, ["href", "src"])
}

fn first_url(
    dom: &dyn DomPort,
    element: ElementId,
    window: WindowId,
    attributes: [&str; 2],
) -> Option<String> {
    let raw = attributes
        .into_iter()
        .find_map(|name| dom.attribute(element, name))?;
    let base = dom.base_url(window);
    Some(normalize_url(base.as_deref(), &raw))
}

fn input_type(dom: &dyn DomPort, element: ElementId, tag: &str) -> String {
    match dom.attribute(element, "type") {
        Some(kind) if !kind.trim().is_empty() => kind.trim().to_ascii_lowercase(),
        _ if tag == "textarea" => "textarea".to_string(),
        _ => "text".to_string(),
    }
}

pub struct Resolver<'a> {
    dom: &'a mut dyn DomPort,
    open_mode: OpenMode,
}

impl<'a> Resolver<'a> {
    pub fn new(dom: &'a mut dyn DomPort, open_mode: OpenMode) -> Self {
        Self { dom, open_mode }
    }

    fn button(&self) -> MouseButton {
        if self.open_mode.contains(OpenMode::NEW_VIEW) {
            MouseButton::Auxiliary
        } else {
            MouseButton::Primary
        }
    }

    /// Dispatch one user-like mouse event. Elements inside frames get focus
    /// first so the frame's document receives the event.
    pub fn mouse_event(&mut self, target: Target, kind: MouseEventKind) {
        if target.window != self.dom.top_window() {
            self.dom.focus(target.element);
        }
        let event = MouseEventInit::user_like(kind, self.button());
        self.dom.dispatch_mouse_event(target.element, event);
    }

    pub fn full_click(&mut self, target: Target) {
        for kind in FULL_CLICK {
            self.mouse_event(target, kind);
        }
    }

    /// Classify `target`, performing the click itself for buttons and for
    /// elements that carry no recognizable click signal.
    pub fn evaluate(&mut self, target: Target, category: Category) -> ActionDescriptor {
        let element = target.element;
        let tag = self.dom.tag_name(element).to_ascii_lowercase();

        if self.open_mode.opens_elsewhere()
            && self.dom.attribute(element, "target").as_deref() == Some("_blank")
        {
            self.dom.remove_attribute(element, "target");
        }

        let url = element_url(&*self.dom, element, target.window);
        let mut descriptor = ActionDescriptor {
            element,
            class: ElementClass::Click,
            kind: ActionKind::Click,
            resource: url.clone().map_or(Resource::Unknown, Resource::Url),
            url,
            performed: false,
        };

        if category.defers_to_caller() {
            descriptor.class = ElementClass::None;
            descriptor.kind = ActionKind::None;
            descriptor.resource = Resource::None;
        } else if tag == "input" || tag == "textarea" {
            let kind = input_type(&*self.dom, element, &tag);
            match kind.as_str() {
                "radio" | "checkbox" => {
                    descriptor.class = ElementClass::Check;
                    descriptor.kind = ActionKind::ClickFocus;
                    descriptor.resource = Resource::Marker(kind);
                }
                "submit" | "reset" | "button" => {
                    self.mouse_event(target, MouseEventKind::Click);
                    descriptor.kind = ActionKind::Click;
                    descriptor.resource = Resource::Marker(kind);
                    descriptor.performed = true;
                }
                _ => {
                    descriptor.class = ElementClass::Input;
                    descriptor.kind = ActionKind::Focus;
                    descriptor.resource = Resource::Marker(tag.clone());
                }
            }
        } else if self.dom.has_attribute(element, "role") {
            descriptor.kind = ActionKind::ActivateAllEvents;
            descriptor.resource = Resource::Marker("role".to_string());
        } else if tag == "a" || tag == "area" || self.dom.has_attribute(element, "onclick") {
            descriptor.kind = ActionKind::Click;
        } else if self.dom.has_attribute(element, "onmousedown") {
            descriptor.kind = ActionKind::MouseDown;
        } else if self.dom.has_attribute(element, "onmouseover") {
            descriptor.kind = ActionKind::MouseOver;
        } else {
            self.full_click(target);
            descriptor.kind = ActionKind::ActivateAllEvents;
            descriptor.performed = true;
        }

        debug!(%element, %category, descriptor = %descriptor, "resolved hint target");
        descriptor
    }

    /// Apply a deferred action to `target`.
    pub fn perform(&mut self, target: Target, kind: ActionKind) {
        match kind {
            ActionKind::None => {}
            ActionKind::Focus => self.dom.focus(target.element),
            ActionKind::ClickFocus => {
                self.dom.focus(target.element);
                self.mouse_event(target, MouseEventKind::Click);
            }
            ActionKind::ActivateAllEvents => self.full_click(target),
            ActionKind::Click => self.mouse_event(target, MouseEventKind::Click),
            ActionKind::MouseDown => self.mouse_event(target, MouseEventKind::MouseDown),
            ActionKind::MouseOver => self.mouse_event(target, MouseEventKind::MouseOver),
        }
    }
}
