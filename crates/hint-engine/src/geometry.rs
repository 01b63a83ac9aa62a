use hintkit_core_types::{DomPort, ElementId, Rect, WindowId};

/// Page offsets that convert client rectangles into positions for injected
/// absolutely-positioned nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DocumentOffsets {
    pub x: f64,
    pub y: f64,
}

impl DocumentOffsets {
    pub fn shifted(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Client rectangle of `element` when it is at least partly inside the
/// viewport of `window`, `None` otherwise.
pub fn visible_rect(dom: &dyn DomPort, element: ElementId, window: WindowId) -> Option<Rect> {
    if dom.computed_style(element).is_hidden() {
        return None;
    }
    let rect = dom.client_rects(element).into_iter().next()?;
    let viewport = dom.viewport(window);
    if rect.top > viewport.height
        || rect.bottom() < 0.0
        || rect.left > viewport.width
        || rect.right() < 0.0
    {
        return None;
    }
    Some(rect)
}

/// Offsets are relative to the body box when the body is positioned,
/// otherwise they follow the window scroll position.
pub fn document_offsets(dom: &dyn DomPort, window: WindowId) -> DocumentOffsets {
    if let Some(body) = dom.body(window) {
        if dom.computed_style(body).is_positioned() {
            if let Some(rect) = dom.bounding_rect(body) {
                return DocumentOffsets {
                    x: -rect.left,
                    y: -rect.top,
                };
            }
        }
    }
    let viewport = dom.viewport(window);
    DocumentOffsets {
        x: viewport.scroll_x,
        y: viewport.scroll_y,
    }
}
