use thiserror::Error;

use crate::geometry::{ComputedStyle, Rect, Viewport};
use crate::{ElementId, RenderHandle, WindowId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("frame access denied: {0}")]
    FrameAccess(String),
    #[error("unknown element: {0}")]
    UnknownElement(ElementId),
    #[error("unknown window: {0}")]
    UnknownWindow(WindowId),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MouseEventKind {
    MouseDown,
    MouseOver,
    Click,
    MouseUp,
}

impl MouseEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseEventKind::MouseDown => "mousedown",
            MouseEventKind::MouseOver => "mouseover",
            MouseEventKind::Click => "click",
            MouseEventKind::MouseUp => "mouseup",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum MouseButton {
    #[default]
    Primary,
    /// Reported to page listeners as button 1, the "open in new view" button.
    Auxiliary,
}

impl MouseButton {
    pub fn code(&self) -> u16 {
        match self {
            MouseButton::Primary => 0,
            MouseButton::Auxiliary => 1,
        }
    }
}

/// Parameters of a synthetic mouse event.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MouseEventInit {
    pub kind: MouseEventKind,
    pub bubbles: bool,
    pub cancelable: bool,
    pub button: MouseButton,
}

impl MouseEventInit {
    pub fn user_like(kind: MouseEventKind, button: MouseButton) -> Self {
        Self {
            kind,
            bubbles: true,
            cancelable: true,
            button,
        }
    }
}

/// Absolute page position of a hint label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HintPlacement {
    pub top: f64,
    pub left: f64,
    pub z_index: i32,
}

/// Absolute page box of a highlight overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayGeometry {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
}

/// Read and mutate access to a live document tree.
///
/// Reads take `&self`; anything that changes the page takes `&mut self`.
/// Queries return elements in document order.
pub trait DomPort {
    fn top_window(&self) -> WindowId;

    fn query_all(&self, window: WindowId, selector: &str) -> Result<Vec<ElementId>, DomError>;

    /// Content window of a `frame`/`iframe` element. `Ok(None)` when the frame
    /// has no document loaded.
    fn content_window(&self, frame: ElementId) -> Result<Option<WindowId>, DomError>;

    fn tag_name(&self, element: ElementId) -> String;
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn has_attribute(&self, element: ElementId, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }

    fn text_content(&self, element: ElementId) -> String;
    fn inner_text(&self, element: ElementId) -> String;
    fn computed_style(&self, element: ElementId) -> ComputedStyle;
    fn client_rects(&self, element: ElementId) -> Vec<Rect>;
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;

    fn viewport(&self, window: WindowId) -> Viewport;
    fn body(&self, window: WindowId) -> Option<ElementId>;
    fn base_url(&self, window: WindowId) -> Option<String>;

    /// `area` children of the first `map` element named `map_name`.
    fn image_map_areas(&self, window: WindowId, map_name: &str) -> Vec<ElementId>;

    fn active_element(&self, window: WindowId) -> Option<ElementId>;
    fn is_content_editable(&self, element: ElementId) -> bool;
    fn value(&self, element: ElementId) -> Option<String>;
    /// Selection bounds in characters.
    fn selection_range(&self, element: ElementId) -> Option<(usize, usize)>;

    fn remove_attribute(&mut self, element: ElementId, name: &str);
    fn focus(&mut self, element: ElementId);
    fn blur_active(&mut self, window: WindowId);
    fn dispatch_mouse_event(&mut self, element: ElementId, event: MouseEventInit);
    fn set_value(&mut self, element: ElementId, value: &str);
    fn set_selection_range(&mut self, element: ElementId, start: usize, end: usize);
    /// Replace the window's current selection with `text` and collapse the
    /// caret after it.
    fn insert_text_at_caret(&mut self, window: WindowId, text: &str);
}

/// Sink for the nodes the engine injects into a page.
pub trait RenderPort {
    /// Install the hint stylesheet once per window.
    fn ensure_stylesheet(&mut self, window: WindowId, css: &str);
    fn insert_style_rule(&mut self, window: WindowId, rule: &str);

    fn create_hint(&mut self, window: WindowId, placement: HintPlacement) -> RenderHandle;
    fn set_hint_label(&mut self, hint: RenderHandle, text: &str);
    fn set_hint_visible(&mut self, hint: RenderHandle, visible: bool);
    fn set_hint_font(&mut self, hint: RenderHandle, font: &str);

    fn create_overlay(&mut self, window: WindowId, geometry: OverlayGeometry) -> RenderHandle;
    fn attach_overlay(&mut self, overlay: RenderHandle);
    fn detach_overlay(&mut self, overlay: RenderHandle);
    fn set_overlay_background(&mut self, overlay: RenderHandle, color: &str);

    fn create_notifier(&mut self, window: WindowId, css: &str) -> RenderHandle;
    fn set_notifier_text(&mut self, notifier: RenderHandle, text: &str);

    /// Detach any node created by this port. Removing twice is a no-op.
    fn remove(&mut self, handle: RenderHandle);
}
