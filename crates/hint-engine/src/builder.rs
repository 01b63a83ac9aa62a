//! Hint-set construction: document traversal, candidate collection and label
//! placement.

use hintkit_core_types::{
    DomPort, ElementId, HintPlacement, OverlayGeometry, Rect, RenderHandle, RenderPort, WindowId,
};
use tracing::{debug, warn};

use crate::geometry::{document_offsets, visible_rect, DocumentOffsets};
use crate::model::{Category, HintNode, Variant};
use crate::policy::HintTheme;

const HINT_Z_INDEX: i32 = 37002;
const OVERLAY_Z_INDEX: i32 = 37001;
const MAX_FRAME_DEPTH: usize = 16;
const FRAME_SELECTOR: &str = "frame, iframe";

/// A visible element found during traversal, not yet rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub element: ElementId,
    pub window: WindowId,
    pub rect: Rect,
    pub offsets: DocumentOffsets,
    pub is_area: bool,
}

pub struct CandidateCollector<'a> {
    dom: &'a dyn DomPort,
    render: &'a mut dyn RenderPort,
    theme: &'a HintTheme,
    category: Category,
    selector: String,
    found: Vec<Candidate>,
}

impl<'a> CandidateCollector<'a> {
    pub fn new(
        dom: &'a dyn DomPort,
        render: &'a mut dyn RenderPort,
        theme: &'a HintTheme,
        category: Category,
    ) -> Self {
        Self {
            dom,
            render,
            theme,
            category,
            selector: format!("{}, {}", category.selector(), FRAME_SELECTOR),
            found: Vec::new(),
        }
    }

    /// Walk `window` and its frames depth-first, in document order.
    pub fn collect(mut self, window: WindowId) -> Vec<Candidate> {
        self.visit_window(window, 0);
        self.found
    }

    fn visit_window(&mut self, window: WindowId, depth: usize) {
        if depth > MAX_FRAME_DEPTH {
            warn!(%window, depth, "frame nesting too deep; skipping");
            return;
        }
        let elements = match self.dom.query_all(window, &self.selector) {
            Ok(elements) => elements,
            Err(err) => {
                warn!(%window, error = %err, "hint traversal skipped window");
                return;
            }
        };
        self.render
            .ensure_stylesheet(window, &self.theme.stylesheet());
        let offsets = document_offsets(self.dom, window);

        for element in elements {
            let Some(rect) = visible_rect(self.dom, element, window) else {
                continue;
            };
            let tag = self.dom.tag_name(element).to_ascii_lowercase();
            match tag.as_str() {
                "frame" | "iframe" => match self.dom.content_window(element) {
                    Ok(Some(child)) => self.visit_window(child, depth + 1),
                    Ok(None) => debug!(%element, "frame without document"),
                    Err(err) => warn!(%element, error = %err, "frame traversal failed"),
                },
                "img" if self.category != Category::Images => {
                    match self.dom.attribute(element, "usemap") {
                        Some(usemap) => self.push_map_areas(window, &usemap, rect, offsets),
                        None => self.push(element, window, rect, offsets),
                    }
                }
                _ => self.push(element, window, rect, offsets),
            }
        }
    }

    fn push(
        &mut self,
        element: ElementId,
        window: WindowId,
        rect: Rect,
        offsets: DocumentOffsets,
    ) {
        self.found.push(Candidate {
            element,
            window,
            rect,
            offsets,
            is_area: false,
        });
    }

    fn push_map_areas(
        &mut self,
        window: WindowId,
        usemap: &str,
        image_rect: Rect,
        offsets: DocumentOffsets,
    ) {
        let name = usemap.trim().trim_start_matches('#');
        for area in self.dom.image_map_areas(window, name) {
            if !self.dom.has_attribute(area, "href") {
                continue;
            }
            let (x, y) = area_origin(self.dom.attribute(area, "coords").as_deref());
            self.found.push(Candidate {
                element: area,
                window,
                rect: image_rect,
                offsets: offsets.shifted(x, y),
                is_area: true,
            });
        }
    }
}

/// First coordinate pair of an `area` `coords` attribute.
fn area_origin(coords: Option<&str>) -> (f64, f64) {
    let mut parts = coords
        .unwrap_or_default()
        .split(',')
        .map(|part| part.trim().parse::<f64>().unwrap_or(0.0));
    let x = parts.next().unwrap_or(0.0);
    let y = parts.next().unwrap_or(0.0);
    (x, y)
}

/// Render a label node for every candidate, nudging labels that would sit on
/// top of an earlier one.
pub fn render_nodes(
    render: &mut dyn RenderPort,
    theme: &HintTheme,
    variant: Variant,
    candidates: Vec<Candidate>,
) -> Vec<HintNode> {
    let mut positions: Vec<(f64, f64)> = Vec::with_capacity(candidates.len());
    let size = theme.collision_size;
    let mut nodes = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let page_top = candidate.rect.top + candidate.offsets.y;
        let page_left = candidate.rect.left + candidate.offsets.x;
        let top = page_top.max(0.0);
        let mut left = page_left.max(0.0);
        let collides = positions.iter().any(|&(p_top, p_left)| {
            p_top - size <= top && top <= p_top + size && p_left - size <= left && left <= p_left + size
        });
        if collides {
            left += (size * 2.5).ceil();
        }
        positions.push((top, left));

        let hint = render.create_hint(
            candidate.window,
            HintPlacement {
                top: top + theme.offset_top,
                left: left + theme.offset_left,
                z_index: HINT_Z_INDEX,
            },
        );
        let mut node = HintNode {
            element: candidate.element,
            window: candidate.window,
            variant,
            label: String::new(),
            hint,
            rect: candidate.rect,
            page_top,
            page_left,
            placed_top: top,
            placed_left: left,
            is_area: candidate.is_area,
            overlay: None,
        };
        if theme.mark_hints {
            if let Some(overlay) = create_overlay(render, theme, &mut node) {
                render.attach_overlay(overlay);
            }
        }
        nodes.push(node);
    }
    nodes
}

/// Create the node's highlight box once. Image-map areas get none.
pub fn create_overlay(
    render: &mut dyn RenderPort,
    theme: &HintTheme,
    node: &mut HintNode,
) -> Option<RenderHandle> {
    if node.is_area {
        return None;
    }
    if let Some(existing) = node.overlay {
        return Some(existing);
    }
    let width = if node.page_left > 0.0 {
        node.rect.width
    } else {
        node.rect.width + node.page_left
    };
    let height = if node.page_top > 0.0 {
        node.rect.height
    } else {
        node.rect.height + node.page_top
    };
    let overlay = render.create_overlay(
        node.window,
        OverlayGeometry {
            top: node.page_top.max(0.0),
            left: node.page_left.max(0.0),
            width: width.max(0.0),
            height: height.max(0.0),
            z_index: OVERLAY_Z_INDEX,
        },
    );
    render.set_overlay_background(overlay, &theme.normal_color);
    node.overlay = Some(overlay);
    Some(overlay)
}
